//! Inbound and outbound WebSocket message type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wasil_core::events::DomainEvent;

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Subscribe to a channel.
    Subscribe {
        /// Channel name.
        channel: String,
    },
    /// Unsubscribe from a channel.
    Unsubscribe {
        /// Channel name.
        channel: String,
    },
    /// Pong response to server ping.
    Pong {
        /// Echoed timestamp.
        timestamp: i64,
    },
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Subscription confirmed.
    Subscribed {
        channel: String,
    },
    /// Unsubscription confirmed.
    Unsubscribed {
        channel: String,
    },
    /// A domain event published on a subscribed channel.
    Event {
        channel: String,
        event: DomainEvent,
    },
    /// Keep-alive probe.
    Ping {
        timestamp: i64,
    },
    /// A rejected client message.
    Error {
        code: String,
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl OutboundMessage {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
