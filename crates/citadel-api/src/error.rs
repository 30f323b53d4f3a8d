//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use citadel_core::error::{AppError, ErrorKind};

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

/// An [`AppError`] on its way out of a handler or middleware stage.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Status code for an error kind.
    pub fn status(kind: ErrorKind) -> StatusCode {
        match kind {
            ErrorKind::Validation | ErrorKind::Conflict => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            // TODO: answer NotFound with 404 once clients stop relying on 500 for missing rows.
            ErrorKind::NotFound
            | ErrorKind::Internal
            | ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = Self::status(err.kind);

        if status.is_server_error() {
            match &err.source {
                Some(source) => tracing::error!(
                    kind = %err.kind,
                    message = %err.message,
                    source = %source,
                    "Request failed"
                ),
                None => tracing::error!(kind = %err.kind, message = %err.message, "Request failed"),
            }
        }

        (status, Json(ErrorBody { error: err.message })).into_response()
    }
}

/// Attach the client-facing operation message to a failed result.
pub trait OperationExt<T> {
    /// Server-side failures are reported as `operation` ("Failed to get
    /// post"); client errors keep their own message.
    fn or_fail(self, operation: &str) -> Result<T, ApiError>;
}

impl<T> OperationExt<T> for Result<T, AppError> {
    fn or_fail(self, operation: &str) -> Result<T, ApiError> {
        self.map_err(|err| {
            if err.is_server_side() {
                tracing::warn!(kind = %err.kind, detail = %err.message, operation, "Operation failed");
                ApiError(err.context(operation))
            } else {
                ApiError(err)
            }
        })
    }
}
