//! Shifts command: lists reconstructed shifts.

use std::io::{self, Write};

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use clap::Args;
use punch_core::duration::total_break_ms;
use punch_core::{PeriodFilter, Shift, SubjectId, format_clock, format_duration, reconstruct_shifts};
use punch_db::Database;

use super::util::{clock_time, parse_date, parse_subject};

#[derive(Debug, Args)]
pub struct ShiftsArgs {
    /// Employee whose shifts to list.
    #[arg(long, value_parser = parse_subject)]
    pub employee: SubjectId,

    /// First day to include (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD, defaults to today).
    #[arg(long, value_parser = parse_date, requires = "from")]
    pub to: Option<NaiveDate>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ShiftsArgs {
    fn period(&self, today: NaiveDate) -> PeriodFilter {
        self.from.map_or(PeriodFilter::All, |start| PeriodFilter::Range {
            start,
            end: self.to.unwrap_or(today),
        })
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &ShiftsArgs,
    now: NaiveDateTime,
) -> Result<()> {
    let period = args.period(now.date());
    let punches = db.punches_for_subject(&args.employee, &period)?;
    let shifts = reconstruct_shifts(&args.employee, &punches, now);

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&shifts)?)?;
    } else {
        write_shifts(writer, &args.employee, &shifts)?;
    }
    Ok(())
}

fn row(
    date: &str,
    start: &str,
    end: &str,
    breaks: &str,
    worked: &str,
    kind: &str,
) -> String {
    format!("{date:<10}  {start:<5}  {end:<5}  {breaks:>6}  {worked:>8}  {kind}")
}

/// Renders one line per shift followed by the total.
pub fn write_shifts<W: Write>(writer: &mut W, subject: &SubjectId, shifts: &[Shift]) -> io::Result<()> {
    if shifts.is_empty() {
        writeln!(writer, "No shifts for {subject}.")?;
        return Ok(());
    }

    writeln!(writer, "Shifts for {subject}")?;
    writeln!(writer, "{}", row("Date", "In", "Out", "Breaks", "Worked", "End"))?;
    let mut total = 0;
    for shift in shifts {
        let worked = shift.duration_ms();
        total += worked;
        let end = (!shift.is_open()).then(|| shift.ended_at());
        let kind = if shift.is_orphan() {
            "orphan"
        } else {
            shift.end.as_str()
        };
        writeln!(
            writer,
            "{}",
            row(
                &shift.day_key().to_string(),
                &clock_time(shift.started_at()),
                &clock_time(end),
                &format_clock(total_break_ms(shift)),
                &format_duration(worked),
                kind,
            )
        )?;
    }
    writeln!(writer, "Total: {}", format_duration(total))?;
    Ok(())
}
