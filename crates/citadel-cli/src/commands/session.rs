//! Session management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use citadel_core::config::AppConfig;
use citadel_core::error::AppError;
use citadel_entity::session::Session;

use crate::output::{self, OutputFormat};

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// List the sessions of the account with this email
    List {
        /// Login email
        email: String,
    },
    /// Revoke one session
    Revoke {
        /// Session ID
        id: String,
    },
    /// Revoke every session of the account with this email
    RevokeAll {
        /// Login email
        email: String,
    },
    /// Delete expired sessions now
    Purge,
}

/// Session display row
#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    /// Session ID prefix
    id: String,
    /// Created
    created: String,
    /// Expires
    expires: String,
    /// Expired
    expired: String,
}

impl From<&Session> for SessionRow {
    fn from(s: &Session) -> Self {
        Self {
            id: s.session_id.chars().take(12).collect(),
            created: s.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            expires: s.expires_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            expired: if s.is_expired() { "✓" } else { "✗" }.to_string(),
        }
    }
}

/// Execute session commands
pub async fn execute(
    args: &SessionArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::app_state(config).await?;
    let sessions = &state.session_manager;

    match &args.command {
        SessionCommand::List { email } => {
            let user = find_user(&state, email).await?;
            let rows: Vec<SessionRow> = sessions
                .list(user.user_id)
                .await?
                .iter()
                .map(SessionRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        SessionCommand::Revoke { id } => {
            sessions.revoke(id).await?;
            output::print_success("Session revoked");
        }
        SessionCommand::RevokeAll { email } => {
            let user = find_user(&state, email).await?;
            let count = sessions.revoke_all(user.user_id).await?;
            output::print_success(&format!("Revoked {count} sessions of '{}'", user.username));
        }
        SessionCommand::Purge => {
            let count = sessions.purge_expired().await?;
            output::print_success(&format!("Purged {count} expired sessions"));
        }
    }

    Ok(())
}

async fn find_user(
    state: &citadel_api::AppState,
    email: &str,
) -> Result<citadel_entity::user::User, AppError> {
    state
        .stores
        .users
        .find_by_email(&email.trim().to_lowercase())
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))
}
