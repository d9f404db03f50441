//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use wasil_core::AppError;
use wasil_core::error::ErrorKind;

/// Body returned for persistence failures; the cause stays in the logs.
pub const PERSISTENCE_MESSAGE: &str = "Something went wrong saving your request. Please contact support.";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Handler error. Wraps [`AppError`] so it can be turned into a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::validation(rejection.body_text()))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self(AppError::validation(errors.to_string()))
    }
}

/// Status code and error code for a kind.
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::InvalidTransition => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::ServiceUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        ErrorKind::Persistence => (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_FAILURE"),
        ErrorKind::Storage
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::ExternalService
        | ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, code) = status_for(err.kind);

        let message = match err.kind {
            ErrorKind::Persistence => {
                tracing::error!(error = %err, source = ?err.source, "Persistence failure");
                PERSISTENCE_MESSAGE.to_string()
            }
            _ if status.is_server_error() => {
                tracing::error!(error = %err, source = ?err.source, "Internal server error");
                "Internal server error".to_string()
            }
            _ => err.message,
        };

        let body = ApiErrorResponse {
            success: false,
            error: code.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
