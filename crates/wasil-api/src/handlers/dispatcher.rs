//! Dispatcher directory and queue handlers.

use axum::Json;
use axum::extract::State;

use wasil_entity::dispatcher::Dispatcher;
use wasil_entity::request::ServiceRequest;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/dispatcher/queue: missions assigned to the caller.
pub async fn my_queue(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<ServiceRequest>>>, ApiError> {
    let queue = state.lifecycle.queue_for_dispatcher(&auth).await?;
    Ok(Json(ApiResponse::ok(queue)))
}

/// GET /api/dispatchers
pub async fn list_dispatchers(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Dispatcher>>>, ApiError> {
    let all = state.directory.list().await?;
    Ok(Json(ApiResponse::ok(all.as_ref().clone())))
}

/// GET /api/dispatchers/active: dispatchers currently on the caller's missions.
pub async fn active_for_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Dispatcher>>>, ApiError> {
    let dispatchers = state.directory.active_for_customer(&auth).await?;
    Ok(Json(ApiResponse::ok(dispatchers)))
}
