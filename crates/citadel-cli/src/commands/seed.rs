//! Seed the default accounts.

use citadel_core::config::AppConfig;
use citadel_core::error::{AppError, ErrorKind};
use citadel_entity::user::UserRole;
use citadel_service::Registration;

use crate::output;

const SEED_PASSWORD: &str = "password123";

/// Create `adminuser` (admin) and `regularuser` (user). Accounts that
/// already exist are skipped.
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let state = super::app_state(config).await?;

    let accounts = [
        ("adminuser", "admin@test.com", UserRole::Admin),
        ("regularuser", "user@test.com", UserRole::User),
    ];

    for (username, email, role) in accounts {
        let registration = Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: SEED_PASSWORD.to_string(),
        };
        match state.user_service.create_user(registration, role).await {
            Ok(user) => {
                output::print_success(&format!("Created {role} '{username}'"));
                output::print_kv("user_id", &user.user_id.to_string());
                output::print_kv("email", email);
            }
            Err(e) if e.kind == ErrorKind::Conflict => {
                output::print_warning(&format!("Skipped '{username}': {}", e.message));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
