//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A login session.
///
/// Created on login or registration, deleted on logout or revocation.
/// A row whose `expires_at` has passed is already invalid even if the
/// purge task has not removed it yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Opaque bearer token: 32 random bytes, hex-encoded.
    pub session_id: String,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// When the session stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Check whether the session has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
