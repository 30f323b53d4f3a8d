//! Session administration handlers (admin).

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::info;

use citadel_entity::session::Session;

use crate::error::{ApiError, OperationExt};
use crate::extractors::parse_uuid;
use crate::state::AppState;

/// GET /users/{id}/sessions
pub async fn list_user_sessions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Session>>, ApiError> {
    let user_id = parse_uuid(&id)?;
    let sessions = state
        .session_manager
        .list(user_id)
        .await
        .or_fail("Failed to list sessions")?;
    Ok(Json(sessions))
}

/// DELETE /users/{id}/sessions
pub async fn revoke_user_sessions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = parse_uuid(&id)?;
    let removed = state
        .session_manager
        .revoke_all(user_id)
        .await
        .or_fail("Failed to delete all sessions")?;
    info!(user_id = %user_id, removed, "Sessions revoked by admin");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .session_manager
        .get(&session_id)
        .await
        .or_fail("Failed to retrieve session")?;
    Ok(Json(session))
}

/// DELETE /sessions/{id}
pub async fn revoke_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .session_manager
        .revoke(&session_id)
        .await
        .or_fail("Failed to delete session")?;
    Ok(StatusCode::NO_CONTENT)
}
