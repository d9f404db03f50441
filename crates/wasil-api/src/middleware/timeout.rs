//! Per-request deadline.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use wasil_core::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Fails a request with 503 when its handler exceeds the configured deadline.
pub async fn request_timeout(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let limit = state.config.server.request_timeout();
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => ApiError(AppError::service_unavailable("Request timed out")).into_response(),
    }
}
