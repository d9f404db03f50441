//! In-memory pub/sub for single-node deployments.

use dashmap::DashMap;
use tokio::sync::broadcast;

use wasil_core::events::DomainEvent;

use crate::channel::Channel;

/// Channel → broadcast sender.
///
/// Publishing to a channel nobody listens on is a no-op.
#[derive(Debug)]
pub struct MemoryPubSub {
    channels: DashMap<Channel, broadcast::Sender<DomainEvent>>,
    buffer_size: usize,
}

impl MemoryPubSub {
    /// Create a new in-memory pub/sub
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: DashMap::new(),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Publish an event to a channel. Returns the number of receivers reached.
    pub fn publish(&self, channel: Channel, event: DomainEvent) -> usize {
        let Some(tx) = self.channels.get(&channel).map(|tx| tx.clone()) else {
            return 0;
        };
        match tx.send(event) {
            Ok(n) => n,
            Err(_) => {
                self.channels
                    .remove_if(&channel, |_, tx| tx.receiver_count() == 0);
                0
            }
        }
    }

    /// Subscribe to a channel, returns a receiver
    pub fn subscribe(&self, channel: Channel) -> broadcast::Receiver<DomainEvent> {
        self.channels
            .entry(channel)
            .or_insert_with(|| broadcast::channel(self.buffer_size).0)
            .subscribe()
    }

    /// Number of channels with a live sender.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use wasil_core::events::{AccountEvent, EventPayload};

    fn event() -> DomainEvent {
        DomainEvent::new(
            None,
            EventPayload::Account(AccountEvent::EmailVerified {
                user_id: Uuid::new_v4(),
            }),
        )
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers_only() {
        let pubsub = MemoryPubSub::new(16);
        let mine = Channel::Mailbox(Uuid::new_v4());
        let theirs = Channel::Mailbox(Uuid::new_v4());
        let mut rx = pubsub.subscribe(mine);
        let mut other = pubsub.subscribe(theirs);

        assert_eq!(pubsub.publish(mine, event()), 1);
        assert!(rx.recv().await.is_ok());
        assert!(other.try_recv().is_err());
    }

    #[test]
    fn test_publish_without_listeners_prunes() {
        let pubsub = MemoryPubSub::new(16);
        let channel = Channel::AdminRequests;
        drop(pubsub.subscribe(channel));
        assert_eq!(pubsub.publish(channel, event()), 0);
        assert_eq!(pubsub.channel_count(), 0);
    }
}
