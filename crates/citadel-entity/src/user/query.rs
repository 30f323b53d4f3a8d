//! Filters accepted by the user listing.

use serde::{Deserialize, Serialize};

use citadel_core::types::SortField;

use super::role::UserRole;

/// Columns the user listing may be ordered by.
pub const USER_SORT_COLUMNS: &[&str] = &[
    "user_id",
    "username",
    "email",
    "role",
    "created_at",
    "updated_at",
];

/// Options for listing users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilter {
    /// Case-insensitive substring matched against username and email.
    pub search: Option<String>,
    /// Restrict to one role.
    pub role: Option<UserRole>,
    /// Ordering; empty means `created_at DESC`.
    pub order_by: Vec<SortField>,
}
