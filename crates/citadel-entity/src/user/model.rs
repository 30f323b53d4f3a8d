//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::{Capability, UserRole};

/// A registered account.
///
/// The credential pair (`password_hash`, `salt`) never leaves the server:
/// both fields are skipped when serializing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub user_id: Uuid,
    /// Unique display handle.
    pub username: String,
    /// Unique login email.
    pub email: String,
    /// Base64 scrypt derived key.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// 32-byte random salt used for `password_hash`.
    #[serde(skip_serializing)]
    pub salt: Vec<u8>,
    /// Assigned role.
    pub role: UserRole,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// When the user was last modified.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether this user's role grants `capability`.
    pub fn can(&self, capability: Capability) -> bool {
        self.role.satisfies(capability)
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Desired username.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Pre-computed credential hash.
    pub password_hash: String,
    /// Salt used for `password_hash`.
    pub salt: Vec<u8>,
    /// Assigned role.
    pub role: UserRole,
}
