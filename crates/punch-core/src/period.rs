//! Calendar period filters.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// A set of calendar days, inclusive at both ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PeriodFilter {
    /// No restriction.
    #[default]
    All,
    /// A single calendar day.
    Day { date: NaiveDate },
    /// `start..=end` by calendar date.
    Range { start: NaiveDate, end: NaiveDate },
}

impl PeriodFilter {
    /// The whole of one calendar month.
    pub fn month(year: i32, month: u32) -> Result<Self, ValidationError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(ValidationError::InvalidMonth { year, month })?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or(ValidationError::InvalidMonth { year, month })?;
        Ok(Self::Range {
            start,
            end: next - Duration::days(1),
        })
    }

    /// The whole of one calendar year.
    ///
    /// The last representable year is rejected: its end has no following midnight.
    pub fn year(year: i32) -> Result<Self, ValidationError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or(ValidationError::InvalidMonth { year, month: 1 })?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .filter(|end| end.succ_opt().is_some())
            .ok_or(ValidationError::InvalidMonth { year, month: 12 })?;
        Ok(Self::Range { start, end })
    }

    /// Parses `YYYY-MM` into a month filter.
    pub fn parse_month(value: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidTimestamp {
            value: value.to_string(),
        };
        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::month(year, month)
    }

    /// Inclusive first and last calendar day, or `None` for [`PeriodFilter::All`].
    pub const fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            Self::All => None,
            Self::Day { date } => Some((date, date)),
            Self::Range { start, end } => Some((start, end)),
        }
    }

    /// Half-open timestamp bounds: first day's midnight to the midnight after the last day.
    ///
    /// A period ending on the last representable date is capped at
    /// [`NaiveDateTime::MAX`].
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.date_bounds().map(|(start, end)| {
            let upper = end
                .succ_opt()
                .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN));
            (start.and_time(NaiveTime::MIN), upper)
        })
    }

    /// Whether a calendar day falls in the period.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.date_bounds()
            .is_none_or(|(start, end)| start <= date && date <= end)
    }

    /// Whether a timestamp's calendar day falls in the period.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.contains_date(at.date())
    }

    /// Year and month of the period's first day, if bounded.
    pub fn first_month(&self) -> Option<(i32, u32)> {
        self.date_bounds().map(|(start, _)| (start.year(), start.month()))
    }
}
