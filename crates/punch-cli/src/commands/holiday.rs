//! Holiday command: manages the holiday calendar.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use punch_db::Database;
use serde::Serialize;

use super::util::parse_date;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Holiday date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub date: NaiveDate,

    /// Work site the holiday applies to (defaults to all sites).
    #[arg(long)]
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
struct JsonHoliday {
    date: NaiveDate,
    location: Option<String>,
}

fn describe(location: Option<&str>) -> &str {
    location.unwrap_or("all locations")
}

pub fn add<W: Write>(writer: &mut W, db: &Database, args: &AddArgs) -> Result<()> {
    let location = args
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());
    if db.insert_holiday(args.date, location)? {
        writeln!(writer, "Added holiday {} ({})", args.date, describe(location))?;
    } else {
        writeln!(
            writer,
            "Holiday {} ({}) already exists",
            args.date,
            describe(location)
        )?;
    }
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let holidays = db.list_holidays()?;
    if json {
        let entries: Vec<_> = holidays
            .into_iter()
            .map(|(date, location)| JsonHoliday { date, location })
            .collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }

    if holidays.is_empty() {
        writeln!(writer, "No holidays defined.")?;
        return Ok(());
    }
    for (date, location) in &holidays {
        writeln!(writer, "{date}  {}", describe(location.as_deref()))?;
    }
    Ok(())
}
