//! Notification mailbox events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to a user's notification mailbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MailboxEvent {
    /// A notification was appended to a mailbox.
    NotificationCreated {
        /// The notification ID.
        notification_id: Uuid,
        /// The mailbox owner.
        recipient_id: Uuid,
        /// Committed record.
        snapshot: serde_json::Value,
    },
    /// A notification was marked read.
    NotificationRead {
        /// The notification ID.
        notification_id: Uuid,
        /// The mailbox owner.
        recipient_id: Uuid,
    },
}

impl MailboxEvent {
    /// The mailbox owner.
    pub fn recipient_id(&self) -> Uuid {
        match self {
            Self::NotificationCreated { recipient_id, .. }
            | Self::NotificationRead { recipient_id, .. } => *recipient_id,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::NotificationCreated { .. } => "mailbox.created",
            Self::NotificationRead { .. } => "mailbox.read",
        }
    }
}
