//! Display formatting for worked-time values.
//!
//! Minutes are rounded half-up and carried into the hour, so a value just
//! under two hours prints as `2h 00m`, never `1h 60m`.

const MS_PER_MINUTE: i64 = 60_000;

/// Whole hours and rounded minutes (0..60) of a non-negative duration.
fn hours_minutes(ms: i64) -> (i64, i64) {
    let total_minutes = (ms.max(0) + MS_PER_MINUTE / 2) / MS_PER_MINUTE;
    (total_minutes / 60, total_minutes % 60)
}

/// Formats milliseconds as `"{H}h {MM}m"`. Negative input prints as zero.
pub fn format_duration(ms: i64) -> String {
    let (hours, minutes) = hours_minutes(ms);
    format!("{hours}h {minutes:02}m")
}

/// Formats milliseconds as `"H:MM"` for report tables.
pub fn format_clock(ms: i64) -> String {
    let (hours, minutes) = hours_minutes(ms);
    format!("{hours}:{minutes:02}")
}

/// Formats milliseconds as decimal hours with two places, e.g. `7.50`.
#[allow(clippy::cast_precision_loss)]
pub fn format_decimal_hours(ms: i64) -> String {
    format!("{:.2}", ms.max(0) as f64 / 3_600_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_pads_minutes() {
        assert_eq!(format_duration(28_800_000), "8h 00m");
        assert_eq!(format_duration(27_000_000), "7h 30m");
        assert_eq!(format_duration(3_660_000), "1h 01m");
        assert_eq!(format_duration(0), "0h 00m");
    }

    #[test]
    fn test_format_duration_rounds_minutes() {
        // 29.5 minutes rounds up, 29.4 rounds down.
        assert_eq!(format_duration(1_770_000), "0h 30m");
        assert_eq!(format_duration(1_764_000), "0h 29m");
    }

    #[test]
    fn test_format_duration_carries_sixty_minutes() {
        // 14h 59m 59.999s: minutes round to 60 and roll into the hour.
        assert_eq!(format_duration(53_999_999), "15h 00m");
        assert_eq!(format_duration(7_170_000), "2h 00m");
    }

    #[test]
    fn test_format_duration_negative_is_zero() {
        assert_eq!(format_duration(-1), "0h 00m");
        assert_eq!(format_duration(-3_600_000), "0h 00m");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(27_000_000), "7:30");
        assert_eq!(format_clock(180_000_000), "50:00");
        assert_eq!(format_clock(0), "0:00");
    }

    #[test]
    fn test_format_decimal_hours() {
        assert_eq!(format_decimal_hours(27_000_000), "7.50");
        assert_eq!(format_decimal_hours(-5), "0.00");
        assert_eq!(format_decimal_hours(1_800_000), "0.50");
    }
}
