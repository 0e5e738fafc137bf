//! Special-hours classification of reconstructed shifts.
//!
//! Classifiers run after reconstruction and never change a shift; they report
//! how much of its worked time falls into a category such as night or holiday
//! hours.

use std::collections::HashSet;
use std::ops::Range;

use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use crate::shift::Shift;

/// The categories of special hours a report tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoursClass {
    Night,
    Holiday,
}

/// Decides what share of a shift's worked time belongs to a class.
pub trait ShiftClassifier: Send + Sync {
    /// The class this classifier reports.
    fn class(&self) -> HoursClass;

    /// Milliseconds of `worked_ms` that belong to the class.
    fn classify(&self, shift: &Shift, worked_ms: i64) -> i64;
}

/// Counts a whole shift as night hours when it starts late in the evening and
/// ends early in the morning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NightShiftClassifier {
    /// Hours of the day a night shift may start in.
    pub start_hours: Range<u32>,
    /// Hours of the day a night shift may end in.
    pub end_hours: Range<u32>,
}

impl Default for NightShiftClassifier {
    fn default() -> Self {
        Self {
            start_hours: 21..23,
            end_hours: 5..7,
        }
    }
}

impl NightShiftClassifier {
    pub const fn new(start_hours: Range<u32>, end_hours: Range<u32>) -> Self {
        Self {
            start_hours,
            end_hours,
        }
    }
}

impl ShiftClassifier for NightShiftClassifier {
    fn class(&self) -> HoursClass {
        HoursClass::Night
    }

    fn classify(&self, shift: &Shift, worked_ms: i64) -> i64 {
        let Some(start) = shift.started_at() else {
            return 0;
        };
        let end = shift.ended_at();
        if self.start_hours.contains(&start.hour()) && self.end_hours.contains(&end.hour()) {
            worked_ms
        } else {
            0
        }
    }
}

/// Answers whether a date is a holiday at a work site.
pub trait HolidayCalendar: Send + Sync {
    fn is_holiday(&self, date: NaiveDate, location: Option<&str>) -> bool;
}

/// In-memory holiday calendar.
///
/// Entries without a location apply to every site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidaySet {
    entries: HashSet<(NaiveDate, Option<String>)>,
}

impl HolidaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a holiday, optionally limited to one location.
    pub fn insert(&mut self, date: NaiveDate, location: Option<String>) {
        self.entries.insert((date, location));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(NaiveDate, Option<String>)> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Option<String>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl HolidayCalendar for HolidaySet {
    fn is_holiday(&self, date: NaiveDate, location: Option<&str>) -> bool {
        self.entries.contains(&(date, None))
            || location.is_some_and(|loc| self.entries.contains(&(date, Some(loc.to_string()))))
    }
}

/// Counts a whole shift as holiday hours when it starts on a holiday at its location.
#[derive(Debug, Clone)]
pub struct HolidayClassifier<C> {
    calendar: C,
}

impl<C: HolidayCalendar> HolidayClassifier<C> {
    pub const fn new(calendar: C) -> Self {
        Self { calendar }
    }
}

impl<C: HolidayCalendar> ShiftClassifier for HolidayClassifier<C> {
    fn class(&self) -> HoursClass {
        HoursClass::Holiday
    }

    fn classify(&self, shift: &Shift, worked_ms: i64) -> i64 {
        let Some(start) = shift.started_at() else {
            return 0;
        };
        if self
            .calendar
            .is_holiday(start.date(), shift.location.as_deref())
        {
            worked_ms
        } else {
            0
        }
    }
}
