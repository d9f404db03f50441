//! Administrator handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use wasil_core::types::{PageResponse, UserId};
use wasil_entity::dispatcher::{CreateDispatcher, Dispatcher};
use wasil_entity::request::ServiceRequest;
use wasil_entity::user::User;
use wasil_service::AdminOverview;

use crate::dto::request::{RequestFilterQuery, SetActiveBody};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{ApiJson, AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/admin/requests?status=&page=&per_page=
pub async fn list_requests(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<RequestFilterQuery>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<ServiceRequest>>>, ApiError> {
    let page = state
        .admin
        .list_requests(&auth, filter.status, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/admin/overview
pub async fn overview(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<AdminOverview>>, ApiError> {
    let overview = state.admin.overview(&auth).await?;
    Ok(Json(ApiResponse::ok(overview)))
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<User>>>, ApiError> {
    let users = state.admin.list_users(&auth).await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// POST /api/admin/dispatchers
pub async fn register_dispatcher(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<CreateDispatcher>,
) -> Result<(StatusCode, Json<ApiResponse<Dispatcher>>), ApiError> {
    let dispatcher = state.directory.register(&auth, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(dispatcher))))
}

/// PATCH /api/admin/dispatchers/{id}/active
pub async fn set_dispatcher_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
    ApiJson(body): ApiJson<SetActiveBody>,
) -> Result<Json<ApiResponse<Dispatcher>>, ApiError> {
    let dispatcher = state.directory.set_active(&auth, id, body.active).await?;
    Ok(Json(ApiResponse::ok(dispatcher)))
}
