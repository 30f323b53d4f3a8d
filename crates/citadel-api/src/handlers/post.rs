//! Post handlers.
//!
//! Any revision id addresses its whole chain. Reads go through
//! `OptionalAuthentication`, so anonymous callers only see public posts.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use citadel_entity::post::PostView;

use crate::dto::request::{CreatePostRequest, PostListQuery, UpdatePostRequest};
use crate::dto::response::PostIdResponse;
use crate::error::{ApiError, OperationExt};
use crate::extractors::{Authenticated, MaybeAuthenticated, QueryParams, ValidJson, parse_uuid};
use crate::state::AppState;

/// GET /posts
pub async fn list_posts(
    State(state): State<AppState>,
    viewer: MaybeAuthenticated,
    QueryParams(query): QueryParams<PostListQuery>,
) -> Result<Json<Vec<PostView>>, ApiError> {
    let filter = query.into_filter()?;
    let posts = state
        .post_service
        .list(viewer.context(), filter)
        .await
        .or_fail("Failed to list posts")?;
    Ok(Json(posts))
}

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    ctx: Authenticated,
    ValidJson(req): ValidJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostIdResponse>), ApiError> {
    let post = state
        .post_service
        .create(&ctx, req.title, req.content, req.public)
        .await
        .or_fail("Failed to create post")?;
    Ok((
        StatusCode::CREATED,
        Json(PostIdResponse {
            post_id: post.post_id,
        }),
    ))
}

/// GET /posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    viewer: MaybeAuthenticated,
    Path(id): Path<String>,
) -> Result<Json<PostView>, ApiError> {
    let post_id = parse_uuid(&id)?;
    let post = state
        .post_service
        .get(viewer.context(), post_id)
        .await
        .or_fail("Failed to get post")?;
    Ok(Json(post))
}

/// PATCH /posts/{id}
///
/// Responds with the id of the new revision.
pub async fn update_post(
    State(state): State<AppState>,
    ctx: Authenticated,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdatePostRequest>,
) -> Result<Json<PostIdResponse>, ApiError> {
    let post_id = parse_uuid(&id)?;
    let post = state
        .post_service
        .update(&ctx, post_id, req.into())
        .await
        .or_fail("Failed to update post")?;
    Ok(Json(PostIdResponse {
        post_id: post.post_id,
    }))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    ctx: Authenticated,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let post_id = parse_uuid(&id)?;
    state
        .post_service
        .delete(&ctx, post_id)
        .await
        .or_fail("Failed to delete post")?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /posts/{id}/revisions
pub async fn list_revisions(
    State(state): State<AppState>,
    viewer: MaybeAuthenticated,
    Path(id): Path<String>,
) -> Result<Json<Vec<PostView>>, ApiError> {
    let post_id = parse_uuid(&id)?;
    let revisions = state
        .post_service
        .revisions(viewer.context(), post_id)
        .await
        .or_fail("Failed to list revisions")?;
    Ok(Json(revisions))
}
