//! Catalog categories and priorities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use wasil_core::AppError;

/// Grouping of catalog offerings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Networking, computers and devices.
    ItTech,
    /// Batteries, inverters and panels.
    PowerSolar,
    /// Pipes, leaks and water supply.
    Plumbing,
    /// Medication and groceries.
    Essentials,
    /// Cooking, cleaning and pets.
    Household,
    /// Custom requests.
    Other,
}

impl Category {
    /// All categories in catalog order.
    pub const ALL: [Category; 6] = [
        Self::PowerSolar,
        Self::ItTech,
        Self::Household,
        Self::Plumbing,
        Self::Essentials,
        Self::Other,
    ];

    /// Return the category as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ItTech => "it_tech",
            Self::PowerSolar => "power_solar",
            Self::Plumbing => "plumbing",
            Self::Essentials => "essentials",
            Self::Household => "household",
            Self::Other => "other",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ItTech => "IT & Tech",
            Self::PowerSolar => "Power/Solar",
            Self::Plumbing => "Plumbing",
            Self::Essentials => "Essentials",
            Self::Household => "Household",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Invalid category: '{s}'")))
    }
}

/// Urgency hint shown in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Time-sensitive service.
    High,
    /// Regular service.
    #[default]
    Normal,
}
