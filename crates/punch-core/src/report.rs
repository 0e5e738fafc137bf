//! Per-shift report rows and yearly month buckets.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::classify::{HoursClass, ShiftClassifier};
use crate::duration::total_break_ms;
use crate::shift::Shift;

/// One row of an attendance report: a shift with its accounted time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// The day the shift is attributed to.
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_in: Option<NaiveDateTime>,
    /// End of the shift; absent only while it is still running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_out: Option<NaiveDateTime>,
    /// `clock_out`, `end_of_day` or `open`.
    pub end_kind: String,
    pub break_ms: i64,
    pub worked_ms: i64,
    pub night_ms: i64,
    pub holiday_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl DailyRecord {
    /// Builds the row for one shift, running every classifier over it.
    pub fn from_shift(shift: &Shift, classifiers: &[&dyn ShiftClassifier]) -> Self {
        let worked_ms = shift.duration_ms();
        let classified = |class: HoursClass| -> i64 {
            classifiers
                .iter()
                .filter(|c| c.class() == class)
                .map(|c| c.classify(shift, worked_ms))
                .sum()
        };
        Self {
            date: shift.day_key(),
            clock_in: shift.started_at(),
            clock_out: (!shift.is_open()).then(|| shift.ended_at()),
            end_kind: shift.end.as_str().to_string(),
            break_ms: total_break_ms(shift),
            worked_ms,
            night_ms: classified(HoursClass::Night),
            holiday_ms: classified(HoursClass::Holiday),
            category: shift.category.clone(),
            location: shift.location.clone(),
        }
    }
}

/// Report rows for every shift, in shift order.
pub fn build_daily_records(
    shifts: &[Shift],
    classifiers: &[&dyn ShiftClassifier],
) -> Vec<DailyRecord> {
    shifts
        .iter()
        .map(|shift| DailyRecord::from_shift(shift, classifiers))
        .collect()
}

/// Summed time for a group of report rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursBucket {
    pub worked_ms: i64,
    pub night_ms: i64,
    pub holiday_ms: i64,
}

impl HoursBucket {
    fn add(&mut self, record: &DailyRecord) {
        self.worked_ms += record.worked_ms;
        self.night_ms += record.night_ms;
        self.holiday_ms += record.holiday_ms;
    }

    /// Milliseconds of the given kind; `None` selects plain worked time.
    pub const fn select(&self, class: Option<HoursClass>) -> i64 {
        match class {
            None => self.worked_ms,
            Some(HoursClass::Night) => self.night_ms,
            Some(HoursClass::Holiday) => self.holiday_ms,
        }
    }
}

/// Twelve month buckets for one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: i32,
    /// January first.
    pub months: [HoursBucket; 12],
    pub total: HoursBucket,
}

impl YearSummary {
    /// Buckets the rows dated in `year` by month; rows from other years are skipped.
    pub fn from_records(year: i32, records: &[DailyRecord]) -> Self {
        let mut months = [HoursBucket::default(); 12];
        let mut total = HoursBucket::default();
        for record in records.iter().filter(|r| r.date.year() == year) {
            months[record.date.month0() as usize].add(record);
            total.add(record);
        }
        Self {
            year,
            months,
            total,
        }
    }
}

/// Totals across a set of rows.
pub fn sum_records(records: &[DailyRecord]) -> HoursBucket {
    let mut bucket = HoursBucket::default();
    for record in records {
        bucket.add(record);
    }
    bucket
}
