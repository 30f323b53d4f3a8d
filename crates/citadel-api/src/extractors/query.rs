//! Query string extractor that reports failures in the API error shape.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use citadel_core::error::AppError;

use crate::error::ApiError;

/// Deserialized query parameters.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected query string");
                ApiError(AppError::validation("Invalid request"))
            })?;
        Ok(Self(value))
    }
}
