//! Session token creation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use wasil_core::config::AuthConfig;
use wasil_core::error::AppError;
use wasil_core::types::UserId;
use wasil_entity::user::UserRole;

use super::claims::Claims;

/// Signs HS256 session tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    ttl_hours: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_hours: config.session_ttl_hours as i64,
        }
    }

    /// Issue a token for a user. Returns the token and its expiry.
    pub fn issue(
        &self,
        user_id: UserId,
        role: UserRole,
        name: &str,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let exp = now + chrono::Duration::hours(self.ttl_hours);

        let claims = Claims {
            sub: user_id.into_uuid(),
            role,
            name: name.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))?;
        Ok((token, exp))
    }
}
