//! Database migration management commands.

use clap::{Args, Subcommand};

use citadel_core::config::AppConfig;
use citadel_core::error::AppError;
use citadel_database::{connection, migration};

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
    /// Check that the database answers
    Check,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    let pool = connection::connect(&config.database).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            migration::run_migrations(&pool).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Check => {
            connection::ping(&pool).await?;
            output::print_success("Database is reachable.");
        }
    }

    pool.close().await;
    Ok(())
}
