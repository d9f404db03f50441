//! Subscription plans.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use wasil_core::AppError;

/// Subscription tier of a customer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    /// Entry tier.
    #[default]
    Basic,
    /// Mid tier.
    Standard,
    /// Top tier.
    Premium,
}

impl SubscriptionPlan {
    /// Return the plan as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionPlan {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "standard" => Ok(Self::Standard),
            "premium" => Ok(Self::Premium),
            _ => Err(AppError::validation(format!("Invalid plan: '{s}'"))),
        }
    }
}
