//! Response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Health check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` when the process is serving.
    pub status: String,
    /// Server version.
    pub version: String,
}

/// Identifier of a created post or revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostIdResponse {
    /// Row id.
    pub post_id: Uuid,
}
