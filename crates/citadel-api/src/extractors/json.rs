//! JSON body extractor that reports failures in the API error shape.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use citadel_core::error::AppError;

use crate::error::ApiError;

/// A JSON body that deserialized and passed its `Validate` rules.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "Rejected request body");
            ApiError(AppError::validation("Invalid request body"))
        })?;
        value.validate().map_err(validation_error)?;
        Ok(Self(value))
    }
}

/// Deserialize and validate a raw JSON body.
///
/// Used by handlers that inspect headers before deciding which body shape
/// to expect.
pub fn parse_json<T>(body: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body");
        ApiError(AppError::validation("Invalid request body"))
    })?;
    value.validate().map_err(validation_error)?;
    Ok(value)
}

/// Turn validator failures into one 400 message, first field first.
pub fn validation_error(errors: validator::ValidationErrors) -> ApiError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let message = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("Invalid {field}"),
            })
        })
        .next()
        .unwrap_or_else(|| "Invalid request body".to_string());
    ApiError(AppError::validation(message))
}
