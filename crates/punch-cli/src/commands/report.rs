//! Report command: monthly attendance rows and yearly month summaries.

use std::io::{self, Write};

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::Args;
use punch_core::{
    DailyRecord, HolidayClassifier, HoursBucket, PeriodFilter, ShiftClassifier, SubjectId,
    YearSummary, build_daily_records, format_clock, format_decimal_hours, reconstruct_shifts,
    sum_records,
};
use punch_db::Database;
use serde::Serialize;

use super::util::{clock_time, parse_month, parse_subject};
use crate::Config;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Employee to report on.
    #[arg(long, value_parser = parse_subject)]
    pub employee: SubjectId,

    /// Month to report (YYYY-MM).
    #[arg(long, value_parser = parse_month, conflicts_with = "year", required_unless_present = "year")]
    pub month: Option<PeriodFilter>,

    /// Year to summarize by month.
    #[arg(long)]
    pub year: Option<i32>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// JSON form of a monthly report.
#[derive(Debug, Serialize)]
pub struct JsonMonthReport<'a> {
    pub employee: &'a SubjectId,
    pub period: PeriodFilter,
    pub records: &'a [DailyRecord],
    pub totals: HoursBucket,
}

/// JSON form of a yearly report.
#[derive(Debug, Serialize)]
pub struct JsonYearReport<'a> {
    pub employee: &'a SubjectId,
    pub summary: &'a YearSummary,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    args: &ReportArgs,
    now: NaiveDateTime,
) -> Result<()> {
    let period = match (args.month, args.year) {
        (Some(month), _) => month,
        (None, Some(year)) => PeriodFilter::year(year)?,
        (None, None) => anyhow::bail!("either --month or --year is required"),
    };

    let night = config.night_classifier();
    let holidays = HolidayClassifier::new(db.holidays()?);
    let classifiers: [&dyn ShiftClassifier; 2] = [&night, &holidays];

    let punches = db.punches_for_subject(&args.employee, &period)?;
    let shifts = reconstruct_shifts(&args.employee, &punches, now);
    let records = build_daily_records(&shifts, &classifiers);
    tracing::debug!(
        employee = %args.employee,
        punches = punches.len(),
        rows = records.len(),
        "built report rows"
    );

    match args.year.filter(|_| args.month.is_none()) {
        Some(year) => {
            let summary = YearSummary::from_records(year, &records);
            if args.json {
                let report = JsonYearReport {
                    employee: &args.employee,
                    summary: &summary,
                };
                writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                write_year_report(writer, &args.employee, &summary)?;
            }
        }
        None => {
            if args.json {
                let report = JsonMonthReport {
                    employee: &args.employee,
                    period,
                    records: &records,
                    totals: sum_records(&records),
                };
                writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                let label = period
                    .first_month()
                    .map_or_else(String::new, |(y, m)| format!("{y}-{m:02}"));
                write_month_report(writer, &args.employee, &label, &records)?;
            }
        }
    }
    Ok(())
}

fn write_title<W: Write>(writer: &mut W, title: &str) -> io::Result<()> {
    writeln!(writer, "{title}")?;
    writeln!(writer, "{}", "─".repeat(title.chars().count()))
}

#[expect(clippy::too_many_arguments, reason = "one argument per table column")]
fn month_row(
    date: &str,
    start: &str,
    end: &str,
    pause: &str,
    worked: &str,
    night: &str,
    holiday: &str,
    category: &str,
    location: &str,
) -> String {
    format!(
        "{date:<10}  {start:<5}  {end:<5}  {pause:>5}  {worked:>6}  {night:>5}  {holiday:>7}  {category:<8}  {location}"
    )
}

/// Renders one row per shift with break, night and holiday columns.
pub fn write_month_report<W: Write>(
    writer: &mut W,
    subject: &SubjectId,
    label: &str,
    records: &[DailyRecord],
) -> io::Result<()> {
    write_title(writer, &format!("ATTENDANCE REPORT: {subject}, {label}"))?;
    if records.is_empty() {
        writeln!(writer, "No shifts recorded.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{}",
        month_row(
            "Date", "In", "Out", "Break", "Worked", "Night", "Holiday", "Category", "Location"
        )
    )?;
    for record in records {
        writeln!(
            writer,
            "{}",
            month_row(
                &record.date.to_string(),
                &clock_time(record.clock_in),
                &clock_time(record.clock_out),
                &format_clock(record.break_ms),
                &format_clock(record.worked_ms),
                &format_clock(record.night_ms),
                &format_clock(record.holiday_ms),
                record.category.as_deref().unwrap_or("-"),
                record.location.as_deref().unwrap_or("-"),
            )
        )?;
    }

    let totals = sum_records(records);
    let breaks: i64 = records.iter().map(|r| r.break_ms).sum();
    writeln!(
        writer,
        "{:<10}  {:<5}  {:<5}  {:>5}  {:>6}  {:>5}  {:>7}",
        "Total",
        "",
        "",
        format_clock(breaks),
        format_clock(totals.worked_ms),
        format_clock(totals.night_ms),
        format_clock(totals.holiday_ms),
    )?;
    writeln!(writer)?;
    writeln!(
        writer,
        "Hours: {} worked, {} night, {} holiday",
        format_decimal_hours(totals.worked_ms),
        format_decimal_hours(totals.night_ms),
        format_decimal_hours(totals.holiday_ms),
    )?;
    Ok(())
}

fn year_row(month: &str, worked: &str, night: &str, holiday: &str) -> String {
    format!("{month:<5}  {worked:>7}  {night:>6}  {holiday:>7}")
}

fn bucket_row(month: &str, bucket: &HoursBucket) -> String {
    year_row(
        month,
        &format_clock(bucket.worked_ms),
        &format_clock(bucket.night_ms),
        &format_clock(bucket.holiday_ms),
    )
}

/// Renders twelve month rows and the year total.
pub fn write_year_report<W: Write>(
    writer: &mut W,
    subject: &SubjectId,
    summary: &YearSummary,
) -> io::Result<()> {
    write_title(
        writer,
        &format!("ANNUAL REPORT: {subject}, {}", summary.year),
    )?;
    writeln!(writer, "{}", year_row("Month", "Worked", "Night", "Holiday"))?;
    for (name, bucket) in MONTH_NAMES.iter().zip(&summary.months) {
        writeln!(writer, "{}", bucket_row(name, bucket))?;
    }
    writeln!(writer, "{}", bucket_row("Total", &summary.total))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use insta::assert_snapshot;
    use punch_core::{HolidaySet, NightShiftClassifier, PunchEvent, PunchKind};

    fn ts(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn subject() -> SubjectId {
        SubjectId::new("emp-1").unwrap()
    }

    fn punches() -> Vec<PunchEvent> {
        let punch = |kind, at| PunchEvent::new(subject(), kind, at);
        vec![
            punch(PunchKind::ClockIn, ts(6, 8, 0)),
            punch(PunchKind::ClockOut, ts(6, 12, 0)),
            punch(PunchKind::ClockIn, ts(15, 9, 0))
                .with_category("office")
                .with_location("Madrid"),
            punch(PunchKind::BreakStart, ts(15, 12, 0)),
            punch(PunchKind::BreakEnd, ts(15, 12, 30)),
            punch(PunchKind::ClockOut, ts(15, 17, 0)),
            punch(PunchKind::ClockIn, ts(16, 22, 0)),
            punch(PunchKind::ClockOut, ts(17, 6, 0)),
        ]
    }

    fn records() -> Vec<DailyRecord> {
        let night = NightShiftClassifier::default();
        let holidays = HolidayClassifier::new(HolidaySet::from_iter([(ts(6, 0, 0).date(), None)]));
        let classifiers: [&dyn ShiftClassifier; 2] = [&night, &holidays];
        let shifts = reconstruct_shifts(&subject(), &punches(), ts(31, 12, 0));
        build_daily_records(&shifts, &classifiers)
    }

    fn seeded_db() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        db.insert_punches(&punches()).unwrap();
        db.insert_holiday(ts(6, 0, 0).date(), None).unwrap();
        db
    }

    fn test_config() -> Config {
        Config {
            database_path: ":memory:".into(),
            night_start_hour: 21,
            night_end_hour: 5,
        }
    }

    #[test]
    fn month_report_lists_rows_and_totals() {
        let mut output = Vec::new();
        write_month_report(&mut output, &subject(), "2025-01", &records()).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
ATTENDANCE REPORT: emp-1, 2025-01
─────────────────────────────────
Date        In     Out    Break  Worked  Night  Holiday  Category  Location
2025-01-06  08:00  12:00   0:00    4:00   0:00     4:00  -         -
2025-01-15  09:00  17:00   0:30    7:30   0:00     0:00  office    Madrid
2025-01-16  22:00  06:00   0:00    8:00   8:00     0:00  -         -
Total                      0:30   19:30   8:00     4:00

Hours: 19.50 worked, 8.00 night, 4.00 holiday
");
    }

    #[test]
    fn month_report_without_rows() {
        let mut output = Vec::new();
        write_month_report(&mut output, &subject(), "2025-02", &[]).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
ATTENDANCE REPORT: emp-1, 2025-02
─────────────────────────────────
No shifts recorded.
");
    }

    #[test]
    fn year_report_buckets_by_month() {
        let summary = YearSummary::from_records(2025, &records());
        let mut output = Vec::new();
        write_year_report(&mut output, &subject(), &summary).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
ANNUAL REPORT: emp-1, 2025
──────────────────────────
Month   Worked   Night  Holiday
Jan      19:30    8:00     4:00
Feb       0:00    0:00     0:00
Mar       0:00    0:00     0:00
Apr       0:00    0:00     0:00
May       0:00    0:00     0:00
Jun       0:00    0:00     0:00
Jul       0:00    0:00     0:00
Aug       0:00    0:00     0:00
Sep       0:00    0:00     0:00
Oct       0:00    0:00     0:00
Nov       0:00    0:00     0:00
Dec       0:00    0:00     0:00
Total    19:30    8:00     4:00
");
    }

    #[test]
    fn run_month_report_from_database() {
        let db = seeded_db();
        let args = ReportArgs {
            employee: subject(),
            month: Some(PeriodFilter::month(2025, 1).unwrap()),
            year: None,
            json: false,
        };
        let mut output = Vec::new();
        run(&mut output, &db, &test_config(), &args, ts(31, 12, 0)).unwrap();

        let mut expected = Vec::new();
        write_month_report(&mut expected, &subject(), "2025-01", &records()).unwrap();
        assert_eq!(output, expected);
    }

    #[test]
    fn run_month_report_as_json() {
        let db = seeded_db();
        let args = ReportArgs {
            employee: subject(),
            month: Some(PeriodFilter::month(2025, 1).unwrap()),
            year: None,
            json: true,
        };
        let mut output = Vec::new();
        run(&mut output, &db, &test_config(), &args, ts(31, 12, 0)).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["employee"], "emp-1");
        assert_eq!(parsed["period"]["type"], "range");
        assert_eq!(parsed["records"].as_array().unwrap().len(), 3);
        assert_eq!(parsed["totals"]["worked_ms"], 70_200_000);
        assert_eq!(parsed["totals"]["night_ms"], 28_800_000);
        assert_eq!(parsed["totals"]["holiday_ms"], 14_400_000);
    }

    #[test]
    fn run_year_report_as_json() {
        let db = seeded_db();
        let args = ReportArgs {
            employee: subject(),
            month: None,
            year: Some(2025),
            json: true,
        };
        let mut output = Vec::new();
        run(&mut output, &db, &test_config(), &args, ts(31, 12, 0)).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["summary"]["year"], 2025);
        assert_eq!(parsed["summary"]["months"][0]["worked_ms"], 70_200_000);
        assert_eq!(parsed["summary"]["months"][1]["worked_ms"], 0);
        assert_eq!(parsed["summary"]["total"]["holiday_ms"], 14_400_000);
    }
}
