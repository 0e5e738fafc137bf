//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use punch_core::{PeriodFilter, SubjectId, ValidationError};
use regex::Regex;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").expect("relative time regex is valid")
});

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// The current local wall-clock time.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse a punch time as either a timestamp or relative time.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00", "2026-01-15 10:30", "2026-01-15T10:30:00Z"
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(s: &str, now: NaiveDateTime) -> anyhow::Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(at) = punch_core::parse_timestamp(s) {
        return Ok(at);
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00) or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(now - Duration::minutes(n * minutes_per_unit))
}

/// Clap value parser for `--employee`.
pub fn parse_subject(s: &str) -> Result<SubjectId, ValidationError> {
    SubjectId::new(s)
}

/// Clap value parser for calendar dates.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    punch_core::parse_date(s)
}

/// Clap value parser for `--month YYYY-MM`.
pub fn parse_month(s: &str) -> Result<PeriodFilter, ValidationError> {
    PeriodFilter::parse_month(s)
}

/// Formats a wall-clock time as `HH:MM`, or `-` when absent.
pub fn clock_time(at: Option<NaiveDateTime>) -> String {
    at.map_or_else(|| "-".to_string(), |at| at.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn parse_datetime_accepts_local_timestamps() {
        let at = parse_datetime("2025-01-15 09:30", now()).unwrap();
        assert_eq!(at.to_string(), "2025-01-15 09:30:00");
    }

    #[test]
    fn parse_datetime_accepts_relative_times() {
        assert_eq!(
            parse_datetime("90 minutes ago", now()).unwrap().to_string(),
            "2025-01-15 10:30:00"
        );
        assert_eq!(
            parse_datetime("1 day ago", now()).unwrap().to_string(),
            "2025-01-14 12:00:00"
        );
        assert_eq!(
            parse_datetime("2 weeks ago", now()).unwrap().to_string(),
            "2025-01-01 12:00:00"
        );
    }

    #[test]
    fn parse_datetime_rejects_garbage() {
        let err = parse_datetime("yesterday-ish", now()).unwrap_err();
        assert!(err.to_string().contains("Invalid datetime"));
    }

    #[test]
    fn parse_datetime_rejects_huge_relative_values() {
        let err = parse_datetime("99999999999 weeks ago", now()).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn clock_time_formats_hours_and_minutes() {
        assert_eq!(clock_time(Some(now())), "12:00");
        assert_eq!(clock_time(None), "-");
    }
}
