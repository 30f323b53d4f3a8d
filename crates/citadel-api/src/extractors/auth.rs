//! Access to the [`RequestContext`] attached by the authentication stages.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use citadel_core::error::AppError;
use citadel_service::RequestContext;

use crate::error::ApiError;

/// Context of a request that passed the `Authentication` stage.
#[derive(Debug, Clone)]
pub struct Authenticated(pub RequestContext);

impl std::ops::Deref for Authenticated {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| ApiError(AppError::authentication("Authentication required")))
    }
}

/// Context of a request behind `OptionalAuthentication`; `None` when the
/// caller is anonymous.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticated(pub Option<RequestContext>);

impl MaybeAuthenticated {
    /// Borrow the context, if any.
    pub fn context(&self) -> Option<&RequestContext> {
        self.0.as_ref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for MaybeAuthenticated {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<RequestContext>().cloned()))
    }
}
