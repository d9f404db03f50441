//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Session token TTL in hours.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Lifetime of an email verification token in hours.
    #[serde(default = "default_verification_ttl")]
    pub verification_ttl_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            session_ttl_hours: default_session_ttl(),
            password_min_length: default_password_min(),
            verification_ttl_hours: default_verification_ttl(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_session_ttl() -> u64 {
    24
}

fn default_password_min() -> usize {
    8
}

fn default_verification_ttl() -> u64 {
    48
}
