//! Totals command: worked time for every employee.

use std::collections::BTreeMap;
use std::io::{self, Write};

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::Args;
use punch_core::{
    PeriodFilter, PunchEvent, SubjectId, filter_events, format_duration, period_total,
    reconstruct_by_subject,
};
use punch_db::Database;

use super::util::parse_month;

#[derive(Debug, Args)]
pub struct TotalsArgs {
    /// Restrict to one month (YYYY-MM).
    #[arg(long, value_parser = parse_month)]
    pub month: Option<PeriodFilter>,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &TotalsArgs,
    now: NaiveDateTime,
) -> Result<()> {
    let period = args.month.unwrap_or_default();
    let punches = db.all_punches(&period)?;
    let totals = compute_totals(&punches, &period, now);
    tracing::debug!(employees = totals.len(), "computed totals");
    write_totals(writer, &totals)?;
    Ok(())
}

/// Worked milliseconds per employee, reconstructing employees in parallel.
pub fn compute_totals(
    punches: &[PunchEvent],
    period: &PeriodFilter,
    now: NaiveDateTime,
) -> BTreeMap<SubjectId, i64> {
    reconstruct_by_subject(&filter_events(punches, period), now)
        .into_iter()
        .map(|(subject, shifts)| {
            let worked = period_total(&shifts, period);
            (subject, worked)
        })
        .collect()
}

pub fn write_totals<W: Write>(writer: &mut W, totals: &BTreeMap<SubjectId, i64>) -> io::Result<()> {
    if totals.is_empty() {
        writeln!(writer, "No punches recorded.")?;
        return Ok(());
    }

    let width = totals
        .keys()
        .map(|s| s.as_str().chars().count())
        .chain(["Employee".len()])
        .max()
        .unwrap_or_default();
    writeln!(writer, "{:<width$}  {:>8}", "Employee", "Worked")?;
    for (subject, ms) in totals {
        writeln!(writer, "{:<width$}  {:>8}", subject.as_str(), format_duration(*ms))?;
    }
    let total: i64 = totals.values().sum();
    writeln!(writer, "{:<width$}  {:>8}", "Total", format_duration(total))?;
    Ok(())
}
