//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod health;
pub mod me;
pub mod post;
pub mod session;
pub mod user;

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::error::ErrorBody;

/// Fallback for unmatched paths.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Not found".to_string(),
        }),
    )
}
