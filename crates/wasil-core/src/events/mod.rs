//! Domain events emitted by Wasil operations.
//!
//! Events are published after a write has been committed and are consumed
//! by the real-time bridge, which fans them out to the live views of the
//! customer, the assigned dispatcher, and administrators.

pub mod account;
pub mod mailbox;
pub mod request;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use account::AccountEvent;
pub use mailbox::MailboxEvent;
pub use request::RequestEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event (if applicable).
    pub actor_id: Option<Uuid>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum EventPayload {
    /// A service request changed.
    Request(RequestEvent),
    /// A mailbox entry was created or read.
    Mailbox(MailboxEvent),
    /// An account-level event.
    Account(AccountEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Option<Uuid>, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }

    /// Short machine name of the event, used in logs.
    pub fn name(&self) -> &'static str {
        match &self.payload {
            EventPayload::Request(e) => e.name(),
            EventPayload::Mailbox(e) => e.name(),
            EventPayload::Account(e) => e.name(),
        }
    }
}
