//! Authentication stages.
//!
//! Both stages read the session token (cookie first, bearer second) and
//! validate it with the session manager. On success the request carries a
//! [`RequestContext`] in its extensions.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use citadel_core::error::AppError;
use citadel_service::RequestContext;

use crate::cookie::session_token;
use crate::error::ApiError;
use crate::state::AppState;

/// Rejects the request unless it carries a valid session.
///
/// 401 "Authentication required" when no token is present, 401 "Invalid or
/// expired session" when the token is rejected.
pub async fn require_authentication(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(request.headers(), &state.config.session.cookie_name)
        .ok_or_else(|| AppError::authentication("Authentication required"))?;

    let session = state.session_manager.validate(&token).await?;
    request
        .extensions_mut()
        .insert(RequestContext::new(session));

    Ok(next.run(request).await)
}

/// Attaches the session when a valid token is present; never rejects.
pub async fn optional_authentication(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = session_token(request.headers(), &state.config.session.cookie_name) {
        match state.session_manager.validate(&token).await {
            Ok(session) => {
                request
                    .extensions_mut()
                    .insert(RequestContext::new(session));
            }
            Err(e) => debug!(error = %e, "Continuing anonymously"),
        }
    }

    next.run(request).await
}
