//! Command-line front end for the day planner.
//!
//! # Responsibility
//! - Resolve configuration (flags over environment over defaults).
//! - Own one store for the lifetime of the process and run one command.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use dayplanner_core::db::open_db;
use dayplanner_core::{
    init_logging_from_config, DateKey, PlannerConfig, PlannerStore, SqliteSnapshotRepository,
};
use log::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PlannerConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = Some(log_dir);
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }
    init_logging_from_config(&config).map_err(anyhow::Error::msg)?;

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let mut store = PlannerStore::open(
        SqliteSnapshotRepository::new(&conn),
        config.storage_key.as_str(),
    )?;

    let command = cli.command.name();
    let mut stdout = std::io::stdout().lock();
    cli::execute(cli.command, &mut store, &mut stdout, DateKey::today())?;
    info!(
        "event=cli_command module=cli status=ok command={command} revision={}",
        store.revision()
    );
    Ok(())
}
