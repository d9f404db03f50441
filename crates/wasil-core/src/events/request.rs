//! Service request lifecycle events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to a service request.
///
/// Every variant carries the committed record as a JSON snapshot so that
/// subscribers can project it without reading the store again.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestEvent {
    /// A request was created and assigned.
    Created {
        /// The request ID.
        request_id: Uuid,
        /// The owning customer.
        customer_id: Uuid,
        /// The assigned dispatcher.
        dispatcher_id: Option<Uuid>,
        /// Committed record.
        snapshot: serde_json::Value,
    },
    /// A request advanced along the state machine.
    StatusChanged {
        /// The request ID.
        request_id: Uuid,
        /// The owning customer.
        customer_id: Uuid,
        /// The assigned dispatcher.
        dispatcher_id: Option<Uuid>,
        /// Previous status.
        from: String,
        /// New status.
        to: String,
        /// Committed record.
        snapshot: serde_json::Value,
    },
    /// A request was cancelled.
    Cancelled {
        /// The request ID.
        request_id: Uuid,
        /// The owning customer.
        customer_id: Uuid,
        /// The assigned dispatcher.
        dispatcher_id: Option<Uuid>,
        /// Cancellation reason.
        reason: String,
        /// Committed record.
        snapshot: serde_json::Value,
    },
}

impl RequestEvent {
    /// The request this event is about.
    pub fn request_id(&self) -> Uuid {
        match self {
            Self::Created { request_id, .. }
            | Self::StatusChanged { request_id, .. }
            | Self::Cancelled { request_id, .. } => *request_id,
        }
    }

    /// The owning customer.
    pub fn customer_id(&self) -> Uuid {
        match self {
            Self::Created { customer_id, .. }
            | Self::StatusChanged { customer_id, .. }
            | Self::Cancelled { customer_id, .. } => *customer_id,
        }
    }

    /// The assigned dispatcher, if any.
    pub fn dispatcher_id(&self) -> Option<Uuid> {
        match self {
            Self::Created { dispatcher_id, .. }
            | Self::StatusChanged { dispatcher_id, .. }
            | Self::Cancelled { dispatcher_id, .. } => *dispatcher_id,
        }
    }

    /// The committed record snapshot.
    pub fn snapshot(&self) -> &serde_json::Value {
        match self {
            Self::Created { snapshot, .. }
            | Self::StatusChanged { snapshot, .. }
            | Self::Cancelled { snapshot, .. } => snapshot,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "request.created",
            Self::StatusChanged { .. } => "request.status_changed",
            Self::Cancelled { .. } => "request.cancelled",
        }
    }
}
