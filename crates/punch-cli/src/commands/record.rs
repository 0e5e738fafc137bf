//! Record command for punching the clock.

use std::io::Write;

use anyhow::{Context, Result, ensure};
use chrono::NaiveDateTime;
use clap::Args;
use punch_core::{PunchEvent, PunchId, PunchKind, SubjectId};
use punch_db::Database;
use uuid::Uuid;

use super::util::{parse_datetime, parse_subject};

#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Punch kind: clock_in (in), break_start, break_end, clock_out (out).
    pub kind: PunchKind,

    /// Employee the punch belongs to.
    #[arg(long, value_parser = parse_subject)]
    pub employee: SubjectId,

    /// When the punch happened (defaults to now).
    #[arg(long)]
    pub at: Option<String>,

    /// Category tag for a clock-in.
    #[arg(long)]
    pub category: Option<String>,

    /// Work-site label.
    #[arg(long)]
    pub location: Option<String>,
}

impl RecordArgs {
    fn into_event(self, now: NaiveDateTime) -> Result<PunchEvent> {
        let occurred_at = match self.at.as_deref() {
            Some(at) => parse_datetime(at, now)?,
            None => now,
        };
        let category = self.category.filter(|c| !c.trim().is_empty());
        ensure!(
            category.is_none() || self.kind == PunchKind::ClockIn,
            "--category only applies to clock_in punches, not {}",
            self.kind
        );
        let id = PunchId::new(Uuid::new_v4().to_string())?;
        let mut event = PunchEvent::new(self.employee, self.kind, occurred_at).with_id(id);
        if let Some(category) = category {
            event = event.with_category(category.trim());
        }
        if let Some(location) = self.location.filter(|l| !l.trim().is_empty()) {
            event = event.with_location(location.trim());
        }
        Ok(event)
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: RecordArgs,
    now: NaiveDateTime,
) -> Result<()> {
    let event = args.into_event(now)?;
    db.insert_punches(std::slice::from_ref(&event))
        .context("failed to store punch")?;
    tracing::debug!(?event, "recorded punch");

    let id = event.id.as_ref().map(ToString::to_string).unwrap_or_default();
    writeln!(
        writer,
        "Recorded {} for {} at {} ({id})",
        event.kind,
        event.subject_id,
        event.occurred_at.format("%Y-%m-%d %H:%M"),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use punch_core::PeriodFilter;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(17, 0, 0)
            .unwrap()
    }

    fn args(kind: PunchKind, at: Option<&str>) -> RecordArgs {
        RecordArgs {
            kind,
            employee: SubjectId::new("emp-1").unwrap(),
            at: at.map(str::to_string),
            category: Some("  ".to_string()),
            location: Some(" Madrid ".to_string()),
        }
    }

    #[test]
    fn record_stores_punch_with_generated_id() {
        let mut db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(
            &mut output,
            &mut db,
            args(PunchKind::ClockIn, Some("2025-01-15 09:00")),
            now(),
        )
        .unwrap();

        let stored = db
            .punches_for_subject(&SubjectId::new("emp-1").unwrap(), &PeriodFilter::All)
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].id.is_some());
        assert_eq!(stored[0].category, None);
        assert_eq!(stored[0].location.as_deref(), Some("Madrid"));

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Recorded clock_in for emp-1 at 2025-01-15 09:00 ("));
    }

    #[test]
    fn record_defaults_to_now() {
        let event = args(PunchKind::ClockOut, None).into_event(now()).unwrap();
        assert_eq!(event.occurred_at, now());
    }

    #[test]
    fn record_accepts_relative_times() {
        let event = args(PunchKind::BreakStart, Some("2 hours ago"))
            .into_event(now())
            .unwrap();
        assert_eq!(event.occurred_at.to_string(), "2025-01-15 15:00:00");
    }

    #[test]
    fn record_keeps_category_on_clock_in() {
        let mut clock_in = args(PunchKind::ClockIn, None);
        clock_in.category = Some(" overtime ".to_string());
        let event = clock_in.into_event(now()).unwrap();
        assert_eq!(event.category.as_deref(), Some("overtime"));
    }

    #[test]
    fn record_rejects_category_on_other_kinds() {
        let mut break_start = args(PunchKind::BreakStart, None);
        break_start.category = Some("office".to_string());
        let err = break_start.into_event(now()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "--category only applies to clock_in punches, not break_start"
        );
    }
}
