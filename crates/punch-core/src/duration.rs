//! Worked-time arithmetic across calendar-day boundaries.
//!
//! An interval whose endpoints fall on different local dates is measured in
//! three parts: the tail of the first day (up to the following midnight), the
//! head of the last day (from its midnight), and one full day for every whole
//! elapsed day beyond the first.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::shift::{Break, Shift};

/// Milliseconds in one calendar day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// The last representable millisecond of `date`, 23:59:59.999.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

/// Milliseconds from `start` to `end` using the same-day / overnight split.
///
/// Negative when `end` precedes `start`; callers clamp.
pub fn span_ms(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    let (start_day, end_day) = (start.date(), end.date());
    if start_day >= end_day {
        return (end - start).num_milliseconds();
    }

    let first_day = (start_of_day(start_day) + Duration::days(1) - start).num_milliseconds();
    let last_day = (end - start_of_day(end_day)).num_milliseconds();
    let days_between = (end - start).num_milliseconds() / MS_PER_DAY;
    first_day + last_day + MS_PER_DAY * (days_between - 1).max(0)
}

/// Length of a closed break; open or half-specified breaks count as zero.
pub fn break_duration(brk: &Break) -> i64 {
    brk.span().map_or(0, |(start, end)| span_ms(start, end).max(0))
}

/// Total closed-break time inside a shift.
pub fn total_break_ms(shift: &Shift) -> i64 {
    shift.breaks.iter().map(break_duration).sum()
}

/// Worked milliseconds for a shift, net of closed breaks, clamped at zero.
///
/// Orphaned clock-outs have no start and always measure zero. Breaks that were
/// never closed subtract nothing, including on shifts still open at "now".
pub fn shift_duration(shift: &Shift) -> i64 {
    let Some(start) = shift.started_at() else {
        return 0;
    };
    let raw = span_ms(start, shift.ended_at());
    let net = shift
        .breaks
        .iter()
        .filter_map(Break::span)
        .fold(raw, |acc, (b_start, b_end)| acc - span_ms(b_start, b_end));
    net.max(0)
}
