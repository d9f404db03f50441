//! Claims embedded in every session token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wasil_core::types::UserId;
use wasil_entity::user::UserRole;

/// JWT payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// Role at issuance.
    pub role: UserRole,
    /// Display name at issuance.
    pub name: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
    /// Token ID.
    pub jti: Uuid,
}

impl Claims {
    /// The authenticated user.
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.sub)
    }

    /// Expiry as a timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}
