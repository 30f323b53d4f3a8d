//! Session lifecycle manager.

use std::sync::Arc;

use chrono::Duration;
use rand::TryRngCore;
use rand::rngs::OsRng;
use tracing::{debug, info};
use uuid::Uuid;

use citadel_core::config::SessionConfig;
use citadel_core::error::AppError;
use citadel_database::store::SessionStore;
use citadel_entity::session::Session;

/// Number of random bytes in a session id (hex-encoded to twice as many chars).
pub const SESSION_ID_BYTES: usize = 32;

/// Message for every rejected token. Missing and expired look the same.
pub const INVALID_SESSION: &str = "Invalid or expired session";

/// Issues, validates and revokes session tokens.
#[derive(Clone)]
pub struct SessionManager {
    /// Session persistence.
    sessions: Arc<dyn SessionStore>,
    /// Absolute lifetime of a new session.
    lifetime: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl SessionManager {
    /// Creates a manager issuing sessions that live for `lifetime`.
    pub fn new(sessions: Arc<dyn SessionStore>, lifetime: Duration) -> Self {
        Self { sessions, lifetime }
    }

    /// Creates a manager using the configured session duration.
    pub fn from_config(sessions: Arc<dyn SessionStore>, config: &SessionConfig) -> Self {
        Self::new(sessions, Duration::seconds(config.duration_seconds()))
    }

    /// Lifetime of newly created sessions.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Creates and persists a new session for `user_id`.
    pub async fn create(&self, user_id: Uuid) -> Result<Session, AppError> {
        let session_id = generate_session_id()?;
        let session = self
            .sessions
            .create(&session_id, user_id, self.lifetime)
            .await?;

        info!(user_id = %user_id, expires_at = %session.expires_at, "Session created");
        Ok(session)
    }

    /// Returns the session if it exists and has not expired.
    pub async fn validate(&self, session_id: &str) -> Result<Session, AppError> {
        match self.sessions.find_valid(session_id).await? {
            Some(session) => Ok(session),
            None => {
                debug!("Rejected session token");
                Err(AppError::authentication(INVALID_SESSION))
            }
        }
    }

    /// Deletes one session. Deleting an unknown id is not an error.
    pub async fn revoke(&self, session_id: &str) -> Result<(), AppError> {
        if self.sessions.delete(session_id).await? {
            info!("Session revoked");
        }
        Ok(())
    }

    /// Deletes every session of a user, returning how many were removed.
    pub async fn revoke_all(&self, user_id: Uuid) -> Result<u64, AppError> {
        let count = self.sessions.delete_by_user(user_id).await?;
        info!(user_id = %user_id, count, "All sessions revoked");
        Ok(count)
    }

    /// Sessions of a user, latest expiry first.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Session>, AppError> {
        self.sessions.list_by_user(user_id).await
    }

    /// Looks up one session row regardless of expiry.
    pub async fn get(&self, session_id: &str) -> Result<Session, AppError> {
        self.sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found"))
    }

    /// Deletes expired rows. Validity never depends on this having run.
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        self.sessions.delete_expired().await
    }
}

/// 32 bytes from the OS CSPRNG, hex-encoded.
fn generate_session_id() -> Result<String, AppError> {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::internal(format!("Failed to generate session id: {e}")))?;
    Ok(hex::encode(bytes))
}
