//! `AuthUser` extractor: pulls the JWT from the Authorization header, validates it, and injects the caller context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use wasil_core::AppError;
use wasil_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Read the bearer token of a request.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Verify a session token and build the caller context.
pub fn context_from_token(state: &AppState, token: &str) -> Result<RequestContext, AppError> {
    let claims = state.jwt_decoder.decode(token)?;
    Ok(RequestContext::new(claims.user_id(), claims.role, claims.name))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::authentication("Missing or malformed Authorization header"))?;
        Ok(AuthUser(context_from_token(state, token)?))
    }
}
