//! Admin stage. Must run after `Authentication`.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use citadel_core::error::AppError;
use citadel_entity::user::Capability;
use citadel_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Loads the session's user and requires the admin capability.
///
/// 401 when no session is attached, 403 "Forbidden" when the user cannot
/// be loaded, 403 "Forbidden: admin access required" for other roles.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = request
        .extensions_mut()
        .remove::<RequestContext>()
        .ok_or_else(|| AppError::authentication("Authentication required"))?;

    let user = match state.stores.users.find_by_id(ctx.user_id()).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(AppError::authorization("Forbidden").into()),
        Err(e) => {
            warn!(error = %e, user_id = %ctx.user_id(), "Admin check could not load user");
            return Err(AppError::authorization("Forbidden").into());
        }
    };

    if !user.can(Capability::Administer) {
        warn!(user_id = %user.user_id, role = %user.role, "Admin access denied");
        return Err(AppError::authorization("Forbidden: admin access required").into());
    }

    request.extensions_mut().insert(ctx.with_user(user));
    Ok(next.run(request).await)
}
