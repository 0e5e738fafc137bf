//! Shift reconstruction.
//!
//! Walks one employee's chronologically sorted punches and folds them into
//! [`Shift`]s. Malformed sequences never fail:
//!
//! - a clock-in while a shift is open cuts the open shift at 23:59:59.999 of
//!   its own start date, keeping only its closed breaks
//! - a break-start while already on break is dropped
//! - a break-end with no open break is dropped
//! - break punches outside any shift are dropped
//! - a clock-out with no open shift becomes a standalone zero-length shift
//! - a shift still open after the last punch is measured up to `now`

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rayon::prelude::*;

use crate::duration::end_of_day;
use crate::event::PunchEvent;
use crate::normalize::{normalize_by_subject, normalize_for};
use crate::punch_kind::PunchKind;
use crate::shift::{Break, Shift, ShiftEnd};
use crate::types::SubjectId;

/// A shift that has been opened by a clock-in and not yet closed.
#[derive(Debug, Clone)]
struct OpenShift {
    start: PunchEvent,
    breaks: Vec<Break>,
}

impl OpenShift {
    const fn begin(start: PunchEvent) -> Self {
        Self {
            start,
            breaks: Vec::new(),
        }
    }

    fn has_open_break(&self) -> bool {
        self.breaks.iter().any(Break::is_open)
    }

    fn start_break(mut self, event: &PunchEvent) -> Self {
        if self.has_open_break() {
            tracing::debug!(
                subject = %event.subject_id,
                at = %event.occurred_at,
                "ignoring break start while already on break"
            );
        } else {
            self.breaks.push(Break::opened_by(event.clone()));
        }
        self
    }

    fn end_break(mut self, event: &PunchEvent) -> Self {
        match self.breaks.last_mut() {
            Some(last) if last.is_open() => last.end = Some(event.clone()),
            _ => tracing::debug!(
                subject = %event.subject_id,
                at = %event.occurred_at,
                "ignoring break end with no open break"
            ),
        }
        self
    }

    fn finish(self, end: ShiftEnd) -> Shift {
        Shift {
            subject_id: self.start.subject_id.clone(),
            category: self.start.category.clone(),
            location: self.start.location.clone(),
            start: Some(self.start),
            end,
            breaks: self.breaks,
        }
    }

    /// Closes at the end of the start date, discarding any break left open.
    fn cut_at_end_of_day(mut self) -> Shift {
        let at = end_of_day(self.start.occurred_at.date());
        tracing::debug!(
            subject = %self.start.subject_id,
            started = %self.start.occurred_at,
            %at,
            "missing clock-out, closing shift at end of its start day"
        );
        self.breaks.retain(|b| !b.is_open());
        self.finish(ShiftEnd::EndOfDay { at })
    }
}

/// Fold accumulator: the shift being built plus everything already emitted.
#[derive(Debug, Default)]
struct Reconstruction {
    open: Option<OpenShift>,
    emitted: Vec<Shift>,
}

impl Reconstruction {
    fn step(self, event: &PunchEvent) -> Self {
        let Self { open, mut emitted } = self;
        let open = match (event.kind, open) {
            (PunchKind::ClockIn, current) => {
                if let Some(current) = current {
                    emitted.push(current.cut_at_end_of_day());
                }
                Some(OpenShift::begin(event.clone()))
            }
            (PunchKind::BreakStart, Some(current)) => Some(current.start_break(event)),
            (PunchKind::BreakEnd, Some(current)) => Some(current.end_break(event)),
            (PunchKind::ClockOut, Some(current)) => {
                emitted.push(current.finish(ShiftEnd::ClockOut {
                    event: event.clone(),
                }));
                None
            }
            (PunchKind::ClockOut, None) => {
                tracing::debug!(
                    subject = %event.subject_id,
                    at = %event.occurred_at,
                    "clock-out without clock-in"
                );
                emitted.push(Shift::orphan(event.clone()));
                None
            }
            (PunchKind::BreakStart | PunchKind::BreakEnd, None) => {
                tracing::debug!(
                    subject = %event.subject_id,
                    kind = %event.kind,
                    at = %event.occurred_at,
                    "ignoring break punch outside a shift"
                );
                None
            }
        };
        Self { open, emitted }
    }

    fn finish(self, now: NaiveDateTime) -> Vec<Shift> {
        let Self { open, mut emitted } = self;
        if let Some(current) = open {
            emitted.push(current.finish(ShiftEnd::Open { now }));
        }
        emitted
    }
}

/// Reconstructs shifts from punches that are already sorted and belong to one employee.
///
/// Prefer [`reconstruct_shifts`] unless the input is known to be normalized.
pub fn reconstruct_sorted(events: &[PunchEvent], now: NaiveDateTime) -> Vec<Shift> {
    events
        .iter()
        .fold(Reconstruction::default(), Reconstruction::step)
        .finish(now)
}

/// Reconstructs one employee's shifts from punches in any order.
///
/// Punches of other employees and inactive punches are ignored. `now` closes a
/// shift that is still running. The result is ordered by shift start (orphaned
/// clock-outs by their end).
pub fn reconstruct_shifts(
    subject: &SubjectId,
    events: &[PunchEvent],
    now: NaiveDateTime,
) -> Vec<Shift> {
    let normalized = normalize_for(subject, events);
    let shifts = reconstruct_sorted(&normalized, now);
    tracing::trace!(
        subject = %subject,
        punches = normalized.len(),
        shifts = shifts.len(),
        "reconstructed shifts"
    );
    shifts
}

/// Reconstructs every employee in a mixed batch, in parallel.
pub fn reconstruct_by_subject(
    events: &[PunchEvent],
    now: NaiveDateTime,
) -> BTreeMap<SubjectId, Vec<Shift>> {
    normalize_by_subject(events)
        .into_par_iter()
        .map(|(subject, sequence)| {
            let shifts = reconstruct_sorted(&sequence, now);
            (subject, shifts)
        })
        .collect()
}
