//! Response DTOs.

use serde::{Deserialize, Serialize};

use wasil_entity::user::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Counter response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Sign-up response. The verification token is delivered here until an
/// outbound mailer exists.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub verification_token: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// Document store status.
    pub database: String,
    /// Media storage status.
    pub storage: String,
    /// Open WebSocket connections.
    pub ws_connections: usize,
}
