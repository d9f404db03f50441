//! Dependant (parent profile) handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use wasil_core::types::DependantId;
use wasil_entity::dependant::{CreateDependant, Dependant, UpdateDependant};

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{ApiJson, AuthUser};
use crate::state::AppState;

/// POST /api/dependants
pub async fn create_dependant(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(mut input): ApiJson<CreateDependant>,
) -> Result<(StatusCode, Json<ApiResponse<Dependant>>), ApiError> {
    // Photos go through the upload endpoint.
    input.photo_url = None;
    let dependant = state.dependants.create(&auth, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(dependant))))
}

/// GET /api/dependants
pub async fn list_dependants(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Dependant>>>, ApiError> {
    let dependants = state.dependants.list(&auth).await?;
    Ok(Json(ApiResponse::ok(dependants)))
}

/// GET /api/dependants/{id}
pub async fn get_dependant(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DependantId>,
) -> Result<Json<ApiResponse<Dependant>>, ApiError> {
    let dependant = state.dependants.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(dependant)))
}

/// PATCH /api/dependants/{id}
pub async fn update_dependant(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DependantId>,
    ApiJson(mut changes): ApiJson<UpdateDependant>,
) -> Result<Json<ApiResponse<Dependant>>, ApiError> {
    changes.photo_url = None;
    let dependant = state.dependants.update(&auth, id, changes).await?;
    Ok(Json(ApiResponse::ok(dependant)))
}

/// DELETE /api/dependants/{id}
pub async fn delete_dependant(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DependantId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.dependants.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Dependant deleted".to_string(),
    })))
}
