//! Reconstructed shifts and the breaks inside them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::duration;
use crate::event::PunchEvent;
use crate::types::SubjectId;

/// A pause inside a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Break {
    /// The break-start punch.
    pub start: Option<PunchEvent>,
    /// The break-end punch; `None` while the break was never closed.
    pub end: Option<PunchEvent>,
}

impl Break {
    /// Opens a break from a break-start punch.
    pub const fn opened_by(event: PunchEvent) -> Self {
        Self {
            start: Some(event),
            end: None,
        }
    }

    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Start and end times, only when both punches are present.
    pub fn span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => Some((start.occurred_at, end.occurred_at)),
            _ => None,
        }
    }
}

/// How a shift came to an end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShiftEnd {
    /// Closed by a clock-out punch.
    ClockOut { event: PunchEvent },
    /// Cut at 23:59:59.999 of its start date because another clock-in came first.
    EndOfDay { at: NaiveDateTime },
    /// Still running; measured up to the evaluation time.
    Open { now: NaiveDateTime },
}

impl ShiftEnd {
    /// The instant the shift is measured to.
    pub const fn at(&self) -> NaiveDateTime {
        match self {
            Self::ClockOut { event } => event.occurred_at,
            Self::EndOfDay { at } => *at,
            Self::Open { now } => *now,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ClockOut { .. } => "clock_out",
            Self::EndOfDay { .. } => "end_of_day",
            Self::Open { .. } => "open",
        }
    }
}

/// One reconstructed work session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub subject_id: SubjectId,
    /// The opening clock-in; `None` for an orphaned clock-out.
    pub start: Option<PunchEvent>,
    pub end: ShiftEnd,
    pub breaks: Vec<Break>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Shift {
    /// A standalone shift for a clock-out that had nothing to close.
    pub fn orphan(event: PunchEvent) -> Self {
        Self {
            subject_id: event.subject_id.clone(),
            category: event.category.clone(),
            location: event.location.clone(),
            start: None,
            end: ShiftEnd::ClockOut { event },
            breaks: Vec::new(),
        }
    }

    pub fn started_at(&self) -> Option<NaiveDateTime> {
        self.start.as_ref().map(|e| e.occurred_at)
    }

    pub const fn ended_at(&self) -> NaiveDateTime {
        self.end.at()
    }

    pub const fn is_orphan(&self) -> bool {
        self.start.is_none()
    }

    pub const fn is_open(&self) -> bool {
        matches!(self.end, ShiftEnd::Open { .. })
    }

    /// The calendar day this shift is attributed to.
    ///
    /// Start date, or the end date for an orphaned clock-out.
    pub fn day_key(&self) -> NaiveDate {
        self.started_at().unwrap_or_else(|| self.ended_at()).date()
    }

    /// Worked milliseconds net of closed breaks, never negative.
    pub fn duration_ms(&self) -> i64 {
        duration::shift_duration(self)
    }
}
