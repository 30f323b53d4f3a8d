//! Account operations: registration, login, profile and role changes.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use citadel_auth::password::{CredentialStore, PasswordPolicy};
use citadel_auth::session::SessionManager;
use citadel_core::error::AppError;
use citadel_database::store::UserStore;
use citadel_entity::session::Session;
use citadel_entity::user::{Capability, CreateUser, User, UserFilter, UserRole};

use crate::context::RequestContext;

/// Message for every failed login. Unknown email and wrong password
/// are indistinguishable.
pub const INVALID_LOGIN: &str = "Invalid email or password";

const USERNAME_MAX_LENGTH: usize = 64;

/// Input for creating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    /// Desired username.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Handles account lifecycle operations.
#[derive(Clone)]
pub struct UserService {
    /// User persistence.
    users: Arc<dyn UserStore>,
    /// Password hashing.
    credentials: Arc<CredentialStore>,
    /// Password policy for new credentials.
    policy: PasswordPolicy,
    /// Session issuing.
    sessions: Arc<SessionManager>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        credentials: Arc<CredentialStore>,
        policy: PasswordPolicy,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            users,
            credentials,
            policy,
            sessions,
        }
    }

    /// Creates an account with the given role.
    pub async fn create_user(
        &self,
        registration: Registration,
        role: UserRole,
    ) -> Result<User, AppError> {
        let username = normalize_username(&registration.username)?;
        let email = normalize_email(&registration.email)?;
        self.policy.validate(&registration.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }
        if self.users.username_taken(&username).await? {
            return Err(AppError::conflict("Username is already taken"));
        }

        let (password_hash, salt) = self.credentials.hash(&registration.password, None)?;
        let user = self
            .users
            .create(CreateUser {
                username,
                email,
                password_hash,
                salt,
                role,
            })
            .await?;

        info!(user_id = %user.user_id, role = %user.role, "User created");
        Ok(user)
    }

    /// Registers a regular account and opens its first session.
    pub async fn register(&self, registration: Registration) -> Result<Session, AppError> {
        let user = self.create_user(registration, UserRole::User).await?;
        self.sessions.create(user.user_id).await
    }

    /// Verifies credentials and opens a new session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.users.find_by_email(&email).await? else {
            self.credentials.verify_absent(password)?;
            info!("Login for unknown email");
            return Err(AppError::authentication(INVALID_LOGIN));
        };

        if !self
            .credentials
            .verify(password, &user.password_hash, &user.salt)?
        {
            warn!(user_id = %user.user_id, "Login with wrong password");
            return Err(AppError::authentication(INVALID_LOGIN));
        }

        let session = self.sessions.create(user.user_id).await?;
        info!(user_id = %user.user_id, "Login successful");
        Ok(session)
    }

    /// Fetches a user by id.
    pub async fn get(&self, user_id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// The user behind the current request.
    pub async fn current(&self, ctx: &RequestContext) -> Result<User, AppError> {
        ctx.actor(self.users.as_ref()).await
    }

    /// Lists users matching `filter`.
    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, AppError> {
        self.users.list(filter).await
    }

    /// Renames a user. Only the user themself or an admin may do this.
    pub async fn update_username(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        username: &str,
    ) -> Result<User, AppError> {
        if ctx.user_id() != user_id {
            let actor = self.current(ctx).await?;
            if !actor.can(Capability::ManageAnyUser) {
                return Err(AppError::authorization(
                    "You can only update your own username",
                ));
            }
        }

        let username = normalize_username(username)?;
        let target = self.get(user_id).await?;
        if target.username == username {
            return Ok(target);
        }
        if self.users.username_taken(&username).await? {
            return Err(AppError::conflict("Username is already taken"));
        }

        let user = self.users.update_username(user_id, &username).await?;
        info!(user_id = %user_id, by = %ctx.user_id(), "Username updated");
        Ok(user)
    }

    /// Changes a user's role. Existing sessions stay valid; the new role
    /// applies from the next request.
    pub async fn set_role(&self, user_id: Uuid, role: UserRole) -> Result<User, AppError> {
        let user = self.users.update_role(user_id, role).await?;
        info!(user_id = %user_id, role = %role, "Role updated");
        Ok(user)
    }
}

fn normalize_username(raw: &str) -> Result<String, AppError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(AppError::validation("Username is required"));
    }
    if username.chars().count() > USERNAME_MAX_LENGTH {
        return Err(AppError::validation(format!(
            "Username must be at most {USERNAME_MAX_LENGTH} characters long"
        )));
    }
    Ok(username.to_string())
}

fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AppError::validation("Invalid email address")),
    }
}
