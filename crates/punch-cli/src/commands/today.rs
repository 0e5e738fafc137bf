//! Today command: worked time so far on the current day.

use std::io::{self, Write};

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::Args;
use punch_core::{
    PeriodFilter, PunchEvent, SubjectId, filter_events, format_duration, reconstruct_shifts,
    today_duration,
};
use punch_db::Database;

use super::util::{clock_time, parse_subject};

#[derive(Debug, Args)]
pub struct TodayArgs {
    /// Employee to report on.
    #[arg(long, value_parser = parse_subject)]
    pub employee: SubjectId,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &TodayArgs,
    now: NaiveDateTime,
) -> Result<()> {
    let today = PeriodFilter::Day { date: now.date() };
    let punches = db.punches_for_subject(&args.employee, &today)?;
    write_today(writer, &args.employee, &punches, now)?;
    Ok(())
}

/// Where the employee stands at `now`, judged from today's punches only.
fn status(subject: &SubjectId, punches: &[PunchEvent], now: NaiveDateTime) -> String {
    let today = PeriodFilter::Day { date: now.date() };
    let shifts = reconstruct_shifts(subject, &filter_events(punches, &today), now);
    let Some(last) = shifts.last() else {
        return "not clocked in".to_string();
    };
    if !last.is_open() {
        return format!("clocked out at {}", clock_time(Some(last.ended_at())));
    }
    let open_break = last
        .breaks
        .last()
        .filter(|b| b.is_open())
        .and_then(|b| b.start.as_ref());
    match open_break {
        Some(start) => format!("on break since {}", clock_time(Some(start.occurred_at))),
        None => format!("on shift since {}", clock_time(last.started_at())),
    }
}

pub fn write_today<W: Write>(
    writer: &mut W,
    subject: &SubjectId,
    punches: &[PunchEvent],
    now: NaiveDateTime,
) -> io::Result<()> {
    let worked = today_duration(subject, punches, now);
    writeln!(
        writer,
        "{subject} on {}: {}",
        now.date(),
        format_duration(worked)
    )?;
    writeln!(writer, "Status: {}", status(subject, punches, now))?;
    Ok(())
}
