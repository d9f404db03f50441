//! The acting user of a service call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wasil_core::types::UserId;
use wasil_core::{AppError, AppResult};
use wasil_entity::user::UserRole;

/// Who is calling, taken from the verified session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// Role at the time the session was issued.
    pub role: UserRole,
    /// Display name, used in notification texts.
    pub name: String,
    /// When the call was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, role: UserRole, name: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            name: name.into(),
            request_time: Utc::now(),
        }
    }

    /// Returns whether the caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail with `Forbidden` unless the caller is an admin.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("Administrator role required"))
        }
    }

    /// Fail with `Forbidden` unless the caller has `role`.
    pub fn require_role(&self, role: UserRole) -> AppResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::forbidden(format!("Only a {role} can do this")))
        }
    }
}
