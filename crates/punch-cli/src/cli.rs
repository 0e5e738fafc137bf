//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{delete, holiday, import, record, report, shifts, today, totals};

/// Punch clock.
///
/// Records clock-in, break and clock-out punches and rebuilds worked shifts
/// from them on every query.
#[derive(Debug, Parser)]
#[command(name = "punch", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a punch (clock_in, break_start, break_end, clock_out).
    Record(record::RecordArgs),

    /// Import punches from JSON lines on stdin.
    Import(import::ImportArgs),

    /// Deactivate a punch so it no longer counts.
    Delete(delete::DeleteArgs),

    /// List reconstructed shifts for an employee.
    Shifts(shifts::ShiftsArgs),

    /// Show time worked today.
    Today(today::TodayArgs),

    /// Attendance report for a month or a year.
    Report(report::ReportArgs),

    /// Worked time of every employee.
    Totals(totals::TotalsArgs),

    /// Manage the holiday calendar.
    #[command(subcommand)]
    Holiday(HolidayAction),
}

/// Holiday calendar actions.
#[derive(Debug, Subcommand)]
pub enum HolidayAction {
    /// Add a holiday.
    Add(holiday::AddArgs),

    /// List holidays.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
