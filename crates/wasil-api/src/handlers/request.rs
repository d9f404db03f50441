//! Service request handlers: ordering, tracking, and status changes.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use wasil_core::types::RequestId;
use wasil_entity::dependant::Dependant;
use wasil_entity::request::ServiceRequest;
use wasil_service::CreateRequestInput;

use crate::dto::request::{CancelRequestBody, StatusChangeBody};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{ApiJson, AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/requests
pub async fn create_request(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<CreateRequestInput>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceRequest>>), ApiError> {
    let request = state.lifecycle.create(&auth, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(request))))
}

/// GET /api/requests: the caller's own requests, newest first.
pub async fn list_my_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<ServiceRequest>>>, ApiError> {
    let requests = state.lifecycle.list_for_customer(&auth).await?;
    Ok(Json(ApiResponse::ok(requests)))
}

/// GET /api/requests/{id}
pub async fn get_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RequestId>,
) -> Result<Json<ApiResponse<ServiceRequest>>, ApiError> {
    let request = state.lifecycle.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// POST /api/requests/{id}/cancel
pub async fn cancel_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RequestId>,
    ValidatedJson(body): ValidatedJson<CancelRequestBody>,
) -> Result<Json<ApiResponse<ServiceRequest>>, ApiError> {
    let request = state.lifecycle.cancel(&auth, id, &body.reason).await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// POST /api/requests/{id}/status
pub async fn change_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RequestId>,
    ValidatedJson(body): ValidatedJson<StatusChangeBody>,
) -> Result<Json<ApiResponse<ServiceRequest>>, ApiError> {
    let request = state.lifecycle.advance(&auth, id, body.status).await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// GET /api/requests/{id}/dossier: the parent profile behind a mission.
pub async fn mission_dossier(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RequestId>,
) -> Result<Json<ApiResponse<Dependant>>, ApiError> {
    let dependant = state.dependants.dossier(&auth, id).await?;
    Ok(Json(ApiResponse::ok(dependant)))
}
