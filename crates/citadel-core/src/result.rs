//! Convenience result alias.

use crate::error::AppError;

/// Result type used across every Citadel crate.
pub type AppResult<T> = Result<T, AppError>;
