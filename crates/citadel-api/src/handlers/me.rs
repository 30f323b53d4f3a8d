//! Handlers for the caller's own account.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use tracing::info;

use citadel_entity::session::Session;
use citadel_entity::user::User;

use crate::cookie::clear_cookie;
use crate::error::{ApiError, OperationExt};
use crate::extractors::Authenticated;
use crate::state::AppState;

/// GET /me
pub async fn get_me(
    State(state): State<AppState>,
    ctx: Authenticated,
) -> Result<Json<User>, ApiError> {
    let user = state
        .user_service
        .current(&ctx)
        .await
        .or_fail("Failed to get user")?;
    Ok(Json(user))
}

/// GET /me/sessions
pub async fn list_my_sessions(
    State(state): State<AppState>,
    ctx: Authenticated,
) -> Result<Json<Vec<Session>>, ApiError> {
    let sessions = state
        .session_manager
        .list(ctx.user_id())
        .await
        .or_fail("Failed to list sessions")?;
    Ok(Json(sessions))
}

/// DELETE /me/sessions
///
/// Logs the caller out everywhere, including this client.
pub async fn revoke_my_sessions(
    State(state): State<AppState>,
    ctx: Authenticated,
) -> Result<Response, ApiError> {
    let removed = state
        .session_manager
        .revoke_all(ctx.user_id())
        .await
        .or_fail("Failed to delete all sessions")?;
    info!(user_id = %ctx.user_id(), removed, "Logged out everywhere");

    let cookie = clear_cookie(&state.config.session)?;
    Ok((StatusCode::NO_CONTENT, [(SET_COOKIE, cookie)]).into_response())
}
