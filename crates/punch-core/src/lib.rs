//! Core domain logic for the punch clock.
//!
//! This crate turns raw clock punches into worked time:
//! - Normalization: per-employee chronological ordering
//! - Reconstruction: folding punches into shifts and breaks
//! - Duration: worked milliseconds across midnight, net of breaks
//! - Aggregation: day, week and month buckets, report rows and formatting
//!
//! Everything here is pure and recomputed on every call.

mod aggregate;
mod classify;
pub mod duration;
mod event;
mod format;
mod normalize;
mod period;
pub mod punch_kind;
mod reconstruct;
mod report;
mod shift;
mod source;
mod types;

pub use aggregate::{
    IsoWeek, YearMonth, daily_totals, filter_events, group_by_day, monthly_totals,
    period_total, today_duration, total_duration, weekly_totals,
};
pub use classify::{
    HolidayCalendar, HolidayClassifier, HolidaySet, HoursClass, NightShiftClassifier,
    ShiftClassifier,
};
pub use duration::shift_duration;
pub use event::{PunchEvent, RawPunch};
pub use format::{format_clock, format_decimal_hours, format_duration};
pub use normalize::{normalize, normalize_by_subject, normalize_for};
pub use period::PeriodFilter;
pub use punch_kind::{PunchKind, UnknownPunchKind};
pub use reconstruct::{reconstruct_by_subject, reconstruct_shifts, reconstruct_sorted};
pub use report::{DailyRecord, HoursBucket, YearSummary, build_daily_records, sum_records};
pub use shift::{Break, Shift, ShiftEnd};
pub use source::PunchSource;
pub use types::{PunchId, SubjectId, ValidationError, parse_date, parse_timestamp};
