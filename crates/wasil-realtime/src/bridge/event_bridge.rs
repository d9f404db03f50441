//! Domain event → channel routing.
//!
//! Request changes go to the owner's channel, the assigned dispatcher's
//! channel and the admin feed. Mailbox entries go to the recipient's
//! mailbox channel.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};

use wasil_core::events::{DomainEvent, EventPayload};
use wasil_core::traits::EventPublisher;

use crate::channel::Channel;

use super::memory_pubsub::MemoryPubSub;

/// Publishes domain events onto real-time channels.
#[derive(Debug, Clone)]
pub struct EventBridge {
    pubsub: Arc<MemoryPubSub>,
}

impl EventBridge {
    pub fn new(pubsub: Arc<MemoryPubSub>) -> Self {
        Self { pubsub }
    }

    /// Channels an event is delivered to.
    pub fn route(event: &DomainEvent) -> Vec<Channel> {
        match &event.payload {
            EventPayload::Request(e) => {
                let mut channels = vec![Channel::Customer(e.customer_id()), Channel::AdminRequests];
                if let Some(dispatcher) = e.dispatcher_id() {
                    channels.push(Channel::Dispatcher(dispatcher));
                }
                channels
            }
            EventPayload::Mailbox(e) => vec![Channel::Mailbox(e.recipient_id())],
            EventPayload::Account(_) => Vec::new(),
        }
    }
}

#[async_trait]
impl EventPublisher for EventBridge {
    async fn publish(&self, event: DomainEvent) {
        let channels = Self::route(&event);
        if channels.is_empty() {
            trace!(event = event.name(), "No channel for event");
            return;
        }
        let mut delivered = 0;
        for channel in channels {
            delivered += self.pubsub.publish(channel, event.clone());
        }
        debug!(event = event.name(), event_id = %event.id, delivered, "Event fanned out");
    }
}
