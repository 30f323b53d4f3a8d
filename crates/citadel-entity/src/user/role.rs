//! User role enumeration and the capabilities each role grants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Actions gated by role rather than by ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Reach admin-only routes (user listing, role changes, session control).
    Administer,
    /// Rename any user, not only oneself.
    ManageAnyUser,
    /// Edit or delete posts written by someone else, and read private ones.
    ModerateAnyPost,
}

/// Roles a user can hold.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full administrator.
    Admin,
    /// Regular account.
    #[default]
    User,
}

impl UserRole {
    /// The single place where role semantics live.
    pub fn satisfies(&self, capability: Capability) -> bool {
        match self {
            Self::Admin => true,
            Self::User => match capability {
                Capability::Administer
                | Capability::ManageAnyUser
                | Capability::ModerateAnyPost => false,
            },
        }
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = citadel_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(citadel_core::AppError::validation(format!(
                "invalid role: {s} (must be 'admin' or 'user')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_satisfies_everything() {
        for cap in [
            Capability::Administer,
            Capability::ManageAnyUser,
            Capability::ModerateAnyPost,
        ] {
            assert!(UserRole::Admin.satisfies(cap));
            assert!(!UserRole::User.satisfies(cap));
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::User);
        assert!("ADMIN".parse::<UserRole>().is_err());
        assert!("root".parse::<UserRole>().is_err());
    }
}
