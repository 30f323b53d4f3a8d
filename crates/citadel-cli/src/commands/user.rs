//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use citadel_core::config::AppConfig;
use citadel_core::error::AppError;
use citadel_entity::user::{User, UserFilter, UserRole};
use citadel_service::Registration;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users
    List {
        /// Filter by role
        #[arg(short, long)]
        role: Option<UserRole>,
        /// Substring of username or email
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create an account
    Create {
        /// Username
        username: String,
        /// Login email
        email: String,
        /// Password
        #[arg(long)]
        password: String,
        /// Create the account as admin
        #[arg(long)]
        admin: bool,
    },
    /// Change the role of the account with this email
    SetRole {
        /// Login email
        email: String,
        /// `admin` or `user`
        role: UserRole,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Username
    username: String,
    /// Email
    email: String,
    /// Role
    role: String,
    /// Created at
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.user_id.to_string(),
            username: u.username.clone(),
            email: u.email.clone(),
            role: u.role.to_string(),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::app_state(config).await?;

    match &args.command {
        UserCommand::List { role, search } => {
            let filter = UserFilter {
                search: search.clone(),
                role: *role,
                ..UserFilter::default()
            };
            let users = state.user_service.list(&filter).await?;
            let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
        }
        UserCommand::Create {
            username,
            email,
            password,
            admin,
        } => {
            let role = if *admin { UserRole::Admin } else { UserRole::User };
            let user = state
                .user_service
                .create_user(
                    Registration {
                        username: username.clone(),
                        email: email.clone(),
                        password: password.clone(),
                    },
                    role,
                )
                .await?;
            output::print_success(&format!("Created {role} '{}'", user.username));
            output::print_kv("user_id", &user.user_id.to_string());
        }
        UserCommand::SetRole { email, role } => {
            let user = state
                .stores
                .users
                .find_by_email(&email.trim().to_lowercase())
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))?;

            state.user_service.set_role(user.user_id, *role).await?;
            output::print_success(&format!("User '{}' is now {role}", user.username));
        }
    }

    Ok(())
}
