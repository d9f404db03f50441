//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use wasil_core::AppError;

/// The three actors of the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Expat user who owns dependants and requests.
    Customer,
    /// Field operative executing requests.
    Dispatcher,
    /// Platform operator.
    Admin,
}

impl UserRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Dispatcher => "dispatcher",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" | "user" => Ok(Self::Customer),
            "dispatcher" => Ok(Self::Dispatcher),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: customer, dispatcher, admin"
            ))),
        }
    }
}
