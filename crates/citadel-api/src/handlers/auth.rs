//! Auth handlers: register, login, logout.
//!
//! Register and login accept HTTP Basic `email:password` credentials. When
//! no Basic header is sent the credentials come from the JSON body.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Basic;
use axum_extra::headers::{Authorization, HeaderMapExt};
use tracing::warn;

use citadel_core::error::AppError;
use citadel_service::Registration;

use crate::cookie::{clear_cookie, session_cookie, session_token};
use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::error::{ApiError, OperationExt};
use crate::extractors::parse_json;
use crate::state::AppState;

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let req: RegisterRequest = parse_json(&body)?;

    let (email, password) = match headers.typed_get::<Authorization<Basic>>() {
        Some(basic) => (basic.username().to_string(), basic.password().to_string()),
        None => match (req.email, req.password) {
            (Some(email), Some(password)) => (email, password),
            _ => {
                return Err(AppError::validation("Email and password are required").into());
            }
        },
    };

    let session = state
        .user_service
        .register(Registration {
            username: req.username,
            email,
            password,
        })
        .await
        .or_fail("Failed to register user")?;

    let cookie = session_cookie(&state.config.session, &session.session_id)?;
    Ok((StatusCode::CREATED, [(SET_COOKIE, cookie)], Json(session)).into_response())
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let (email, password) = match headers.typed_get::<Authorization<Basic>>() {
        Some(basic) => (basic.username().to_string(), basic.password().to_string()),
        None => {
            let req: LoginRequest = parse_json(&body)?;
            (req.email, req.password)
        }
    };

    let session = state
        .user_service
        .login(&email, &password)
        .await
        .or_fail("Failed to log in")?;

    let cookie = session_cookie(&state.config.session, &session.session_id)?;
    Ok(([(SET_COOKIE, cookie)], Json(session)).into_response())
}

/// POST /logout
///
/// Always succeeds. A revocation failure is logged and the cookie is
/// cleared regardless.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(token) = session_token(&headers, &state.config.session.cookie_name) {
        if let Err(e) = state.session_manager.revoke(&token).await {
            warn!(error = %e, "Failed to revoke session on logout");
        }
    }

    let cookie = clear_cookie(&state.config.session)?;
    Ok((StatusCode::NO_CONTENT, [(SET_COOKIE, cookie)]).into_response())
}
