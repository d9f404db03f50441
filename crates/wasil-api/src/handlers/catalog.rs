//! Catalog handlers.

use axum::Json;
use axum::extract::{Query, State};

use wasil_service::CatalogEntry;

use crate::dto::request::CatalogQuery;
use crate::dto::response::ApiResponse;
use crate::state::AppState;

/// GET /api/catalog?category=
pub async fn list_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<ApiResponse<Vec<CatalogEntry>>> {
    Json(ApiResponse::ok(state.catalog.list(query.category)))
}
