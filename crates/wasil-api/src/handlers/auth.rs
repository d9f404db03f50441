//! Auth handlers: register, verify, login, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use wasil_auth::Session;
use wasil_entity::user::{UpdateProfile, User};

use crate::dto::request::{LoginRequest, RegisterRequest, VerifyEmailRequest};
use crate::dto::response::{ApiResponse, RegisterResponse};
use crate::error::ApiError;
use crate::extractors::{ApiJson, AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponse>>), ApiError> {
    let registration = state.identity.register(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(RegisterResponse {
            user: registration.user,
            verification_token: registration.verification_token,
        })),
    ))
}

/// POST /api/auth/verify
pub async fn verify_email(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VerifyEmailRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.identity.verify_email(&req.token).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<Session>>, ApiError> {
    let session = state.identity.authenticate(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(session)))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.identity.get_user(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PATCH /api/auth/me
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(mut changes): ApiJson<UpdateProfile>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    // Photos go through the upload endpoint.
    changes.photo_url = None;
    let user = state.identity.update_profile(auth.user_id, changes).await?;
    Ok(Json(ApiResponse::ok(user)))
}
