use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use punch_cli::commands::{delete, holiday, import, record, report, shifts, today, totals, util};
use punch_cli::{Cli, Commands, Config, HolidayAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(punch_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = punch_db::Database::open(&config.database_path).with_context(|| {
        format!("failed to open {}", config.database_path.display())
    })?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut db, config) = open_database(cli.config.as_deref())?;
    let now = util::local_now();
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Record(args) => record::run(&mut stdout, &mut db, args, now)?,
        Commands::Import(args) => {
            let inserted = import::run(&mut db, &args)?;
            writeln!(stdout, "Imported {inserted} punches")?;
        }
        Commands::Delete(args) => delete::run(&mut stdout, &db, &args)?,
        Commands::Shifts(args) => shifts::run(&mut stdout, &db, &args, now)?,
        Commands::Today(args) => today::run(&mut stdout, &db, &args, now)?,
        Commands::Report(args) => report::run(&mut stdout, &db, &config, &args, now)?,
        Commands::Totals(args) => totals::run(&mut stdout, &db, &args, now)?,
        Commands::Holiday(HolidayAction::Add(args)) => holiday::add(&mut stdout, &db, &args)?,
        Commands::Holiday(HolidayAction::List { json }) => holiday::list(&mut stdout, &db, json)?,
    }

    Ok(())
}
