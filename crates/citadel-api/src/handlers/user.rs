//! User handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use citadel_entity::user::User;

use crate::dto::request::{UpdateRoleRequest, UpdateUserRequest, UserListQuery};
use crate::error::{ApiError, OperationExt};
use crate::extractors::{Authenticated, QueryParams, ValidJson, parse_uuid};
use crate::state::AppState;

/// GET /users (admin)
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<UserListQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    let filter = query.into_filter()?;
    let users = state
        .user_service
        .list(&filter)
        .await
        .or_fail("Failed to list users")?;
    Ok(Json(users))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _ctx: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user_id = parse_uuid(&id)?;
    let user = state
        .user_service
        .get(user_id)
        .await
        .or_fail("Failed to get user")?;
    Ok(Json(user))
}

/// PATCH /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    ctx: Authenticated,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let user_id = parse_uuid(&id)?;
    let user = state
        .user_service
        .update_username(&ctx, user_id, &req.username)
        .await
        .or_fail("Failed to update user")?;
    Ok(Json(user))
}

/// PATCH /users/{id}/role (admin)
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateRoleRequest>,
) -> Result<StatusCode, ApiError> {
    let user_id = parse_uuid(&id)?;
    let role = req.role()?;
    state
        .user_service
        .set_role(user_id, role)
        .await
        .or_fail("Failed to update user role")?;
    Ok(StatusCode::NO_CONTENT)
}
