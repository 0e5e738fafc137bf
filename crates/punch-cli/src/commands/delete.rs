//! Delete command: soft-deletes a punch.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use punch_db::Database;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// ID of the punch to deactivate.
    pub id: String,
}

pub fn run<W: Write>(writer: &mut W, db: &Database, args: &DeleteArgs) -> Result<()> {
    if !db.deactivate_punch(&args.id)? {
        anyhow::bail!("no active punch with id {}", args.id);
    }
    tracing::debug!(id = %args.id, "deactivated punch");
    writeln!(writer, "Deleted punch {}", args.id)?;
    Ok(())
}
