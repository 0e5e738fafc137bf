//! CLI subcommand implementations.

pub mod delete;
pub mod holiday;
pub mod import;
pub mod record;
pub mod report;
pub mod shifts;
pub mod today;
pub mod totals;
pub mod util;
