//! Day, week and month buckets of worked time.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::event::PunchEvent;
use crate::period::PeriodFilter;
use crate::reconstruct::reconstruct_shifts;
use crate::shift::Shift;
use crate::types::SubjectId;

/// An ISO-8601 week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IsoWeek {
    pub year: i32,
    pub week: u32,
}

impl From<NaiveDate> for IsoWeek {
    fn from(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// Groups shifts by their day key.
pub fn group_by_day(shifts: &[Shift]) -> BTreeMap<NaiveDate, Vec<&Shift>> {
    let mut days: BTreeMap<NaiveDate, Vec<&Shift>> = BTreeMap::new();
    for shift in shifts {
        days.entry(shift.day_key()).or_default().push(shift);
    }
    days
}

/// Worked milliseconds per calendar day.
pub fn daily_totals(shifts: &[Shift]) -> BTreeMap<NaiveDate, i64> {
    group_by_day(shifts)
        .into_iter()
        .map(|(day, shifts)| (day, shifts.iter().map(|s| s.duration_ms()).sum()))
        .collect()
}

/// Worked milliseconds per ISO week, built from the daily totals.
pub fn weekly_totals(shifts: &[Shift]) -> BTreeMap<IsoWeek, i64> {
    rebucket(daily_totals(shifts), IsoWeek::from)
}

/// Worked milliseconds per calendar month, built from the daily totals.
pub fn monthly_totals(shifts: &[Shift]) -> BTreeMap<YearMonth, i64> {
    rebucket(daily_totals(shifts), YearMonth::from)
}

fn rebucket<K: Ord>(
    days: BTreeMap<NaiveDate, i64>,
    key: impl Fn(NaiveDate) -> K,
) -> BTreeMap<K, i64> {
    let mut buckets = BTreeMap::new();
    for (day, ms) in days {
        *buckets.entry(key(day)).or_insert(0) += ms;
    }
    buckets
}

/// Keeps the punches whose calendar day falls inside `filter`.
pub fn filter_events(events: &[PunchEvent], filter: &PeriodFilter) -> Vec<PunchEvent> {
    events
        .iter()
        .filter(|e| filter.contains(e.occurred_at))
        .cloned()
        .collect()
}

/// Total worked time for one employee over a period.
///
/// Punches are narrowed to the period first and reconstruction runs on what
/// remains, so a shift whose clock-out falls outside the period is measured
/// as if the clock-out were missing. Days are summed after grouping.
pub fn total_duration(
    subject: &SubjectId,
    events: &[PunchEvent],
    filter: &PeriodFilter,
    now: NaiveDateTime,
) -> i64 {
    let visible = filter_events(events, filter);
    period_total(&reconstruct_shifts(subject, &visible, now), filter)
}

/// Sums the days of `shifts` that fall inside `filter`.
pub fn period_total(shifts: &[Shift], filter: &PeriodFilter) -> i64 {
    daily_totals(shifts)
        .into_iter()
        .filter(|(day, _)| filter.contains_date(*day))
        .map(|(_, ms)| ms)
        .sum()
}

/// Worked time on the calendar day of `now`, from that day's punches alone.
pub fn today_duration(subject: &SubjectId, events: &[PunchEvent], now: NaiveDateTime) -> i64 {
    total_duration(
        subject,
        events,
        &PeriodFilter::Day { date: now.date() },
        now,
    )
}
