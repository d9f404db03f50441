//! Mailbox handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use wasil_core::types::{NotificationId, PageResponse};
use wasil_entity::notification::Notification;

use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Notification>>>, ApiError> {
    let page = state.mailbox.list(&auth, &params.into_page_request()).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.mailbox.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<ApiResponse<Notification>>, ApiError> {
    let notification = state.mailbox.mark_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(notification)))
}
