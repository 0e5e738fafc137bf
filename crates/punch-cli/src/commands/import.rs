//! Import command for loading punches from JSON lines.

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use clap::Args;
use punch_core::{PunchEvent, RawPunch, SubjectId};
use punch_db::Database;

use super::util::parse_subject;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Employee to apply when incoming punches omit `subject_id`.
    #[arg(long, value_parser = parse_subject)]
    pub employee: Option<SubjectId>,
}

pub fn run(db: &mut Database, args: &ImportArgs) -> Result<usize> {
    let stdin = io::stdin();
    let punches = parse_punches(stdin.lock(), args.employee.as_ref())?;
    let inserted = db.insert_punches(&punches)?;
    tracing::info!(read = punches.len(), inserted, "imported punches");
    Ok(inserted)
}

/// Parses one punch per line, failing on the first invalid line.
fn parse_punches<R: BufRead>(
    reader: R,
    default_subject: Option<&SubjectId>,
) -> Result<Vec<PunchEvent>> {
    let mut punches = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut raw: RawPunch = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid JSON on line {}", idx + 1))?;
        if raw.subject_id.trim().is_empty() {
            if let Some(subject) = default_subject {
                raw.subject_id = subject.to_string();
            }
        }
        let punch = raw
            .validate()
            .with_context(|| format!("invalid punch on line {}", idx + 1))?;
        punches.push(punch);
    }
    Ok(punches)
}
