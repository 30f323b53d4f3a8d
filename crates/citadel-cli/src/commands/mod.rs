//! CLI command definitions and dispatch.

pub mod migrate;
pub mod seed;
pub mod session;
pub mod user;

use clap::{Parser, Subcommand};

use citadel_api::AppState;
use citadel_core::config::AppConfig;
use citadel_core::error::AppError;
use citadel_database::{Stores, connection};

use crate::output::OutputFormat;

/// Citadel administration
#[derive(Debug, Parser)]
#[command(name = "citadel", version, about, long_about = None)]
pub struct Cli {
    /// Configuration overlay to load from `config/`
    #[arg(short, long, env = "CITADEL_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Create the default admin and regular accounts
    Seed,
    /// User management
    User(user::UserArgs),
    /// Session management
    Session(session::SessionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.env)?;
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Seed => seed::execute(&config).await,
            Commands::User(args) => user::execute(args, &config, self.format).await,
            Commands::Session(args) => session::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: wire the services against PostgreSQL. The in-memory store
/// has nothing to administer from a separate process.
pub async fn app_state(config: &AppConfig) -> Result<AppState, AppError> {
    let pool = connection::connect(&config.database).await?;
    AppState::new(config.clone(), Stores::postgres(pool))
}
