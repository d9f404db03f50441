//! Media upload and download handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;

use wasil_core::AppError;
use wasil_core::types::{DependantId, UserId};
use wasil_service::{DispatcherMedia, MediaTarget};
use wasil_storage::{MediaObject, content_type_for};

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/dependants/{id}/photo
pub async fn upload_dependant_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DependantId>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<MediaObject>>), ApiError> {
    store(&state, &auth, MediaTarget::Dependant(id), multipart).await
}

/// POST /api/me/photo
pub async fn upload_profile_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<MediaObject>>), ApiError> {
    store(&state, &auth, MediaTarget::Profile, multipart).await
}

/// POST /api/dispatchers/{id}/media/{slot}
pub async fn upload_dispatcher_media(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, slot)): Path<(UserId, String)>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<MediaObject>>), ApiError> {
    let slot: DispatcherMedia = slot.parse()?;
    store(&state, &auth, MediaTarget::Dispatcher { id, slot }, multipart).await
}

/// GET /media/{*key}
pub async fn serve_media(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    let (stream, meta) = state.storage.open(&key).await?;
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&key))
        .header(header::CONTENT_LENGTH, meta.size_bytes)
        .header(header::CACHE_CONTROL, "public, max-age=86400")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::internal(format!("Failed to build media response: {e}")).into())
}

async fn store(
    state: &AppState,
    auth: &AuthUser,
    target: MediaTarget,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<MediaObject>>), ApiError> {
    let (content_type, data) = read_file_field(multipart).await?;
    let object = state.media.upload(auth, target, &content_type, data).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(object))))
}

/// Pull the `file` part out of a multipart body.
async fn read_file_field(mut multipart: Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(String::from)
            .ok_or_else(|| AppError::validation("File part has no content type"))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Failed to read upload: {e}")))?;
        return Ok((content_type, data));
    }
    Err(AppError::validation("Missing 'file' part"))
}
