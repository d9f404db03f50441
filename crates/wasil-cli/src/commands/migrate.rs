//! Database migration management commands.

use clap::{Args, Subcommand};

use wasil_core::config::{AppConfig, DatabaseBackend};
use wasil_core::error::AppError;
use wasil_database::DatabasePool;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    if config.database.backend != DatabaseBackend::Postgres {
        return Err(AppError::configuration(
            "Migrations apply to the postgres backend only",
        ));
    }
    let pool = DatabasePool::connect(&config.database).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            wasil_database::migration::run_migrations(pool.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
    }

    pool.close().await;
    Ok(())
}
