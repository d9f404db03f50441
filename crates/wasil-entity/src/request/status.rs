//! Request status and the lifecycle state machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use wasil_core::AppError;

/// Lifecycle status of a service request.
///
/// ```text
/// REQUESTED -> ASSIGNED -> IN_PROGRESS -> COMPLETED
///     \____________\____________\-------> CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Created, not yet assigned.
    Requested,
    /// A dispatcher has been assigned.
    Assigned,
    /// The dispatcher is on it.
    InProgress,
    /// Done.
    Completed,
    /// Cancelled by the customer or an administrator.
    Cancelled,
}

impl RequestStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [RequestStatus; 5] = [
        Self::Requested,
        Self::Assigned,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// The forward successor, if any.
    pub fn successor(&self) -> Option<RequestStatus> {
        match self {
            Self::Requested => Some(Self::Assigned),
            Self::Assigned => Some(Self::InProgress),
            Self::InProgress => Some(Self::Completed),
            Self::Completed | Self::Cancelled => None,
        }
    }

    /// Whether `target` is reachable from `self` in a single step.
    pub fn can_transition_to(&self, target: RequestStatus) -> bool {
        if target == Self::Cancelled {
            return !self.is_terminal();
        }
        self.successor() == Some(target)
    }

    /// Return the status as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Assigned => "ASSIGNED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Label shown to customers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Requested => "Requested",
            Self::Assigned => "Runner Assigned",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| AppError::validation(format!("Invalid request status: '{s}'")))
    }
}
