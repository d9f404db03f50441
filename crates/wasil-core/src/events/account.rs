//! Account events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to user accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountEvent {
    /// A new account was registered.
    Registered {
        /// The user ID.
        user_id: Uuid,
        /// The assigned role.
        role: String,
    },
    /// An account verified its email address.
    EmailVerified {
        /// The user ID.
        user_id: Uuid,
    },
}

impl AccountEvent {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Registered { .. } => "account.registered",
            Self::EmailVerified { .. } => "account.email_verified",
        }
    }
}
