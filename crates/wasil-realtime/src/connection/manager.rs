//! Connection manager: handles connection lifecycle and channel subscriptions.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use wasil_core::config::RealtimeConfig;
use wasil_entity::user::UserRole;

use crate::bridge::MemoryPubSub;
use crate::channel::Channel;
use crate::message::{InboundMessage, OutboundMessage};

use super::handle::{ConnectionHandle, ConnectionId};

/// Manages all active WebSocket connections.
#[derive(Debug)]
pub struct ConnectionManager {
    connections: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    pubsub: Arc<MemoryPubSub>,
    config: RealtimeConfig,
}

impl ConnectionManager {
    pub fn new(config: RealtimeConfig, pubsub: Arc<MemoryPubSub>) -> Self {
        Self {
            connections: DashMap::new(),
            pubsub,
            config,
        }
    }

    /// Registers a new authenticated connection and joins its default channels.
    ///
    /// Returns the connection handle and a receiver for outbound messages.
    pub fn register(
        &self,
        user_id: Uuid,
        role: UserRole,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(user_id, role, tx));
        self.connections.insert(handle.id, handle.clone());

        for channel in Channel::defaults_for(user_id, role) {
            self.attach(&handle, channel);
        }

        info!(conn_id = %handle.id, user_id = %user_id, role = %role, "WebSocket connection registered");
        (handle, rx)
    }

    /// Unregisters a connection and stops its forwarding tasks.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some((_, handle)) = self.connections.remove(conn_id) {
            handle.mark_closed();
            info!(conn_id = %conn_id, user_id = %handle.user_id, "WebSocket connection unregistered");
        }
    }

    /// Processes an inbound message from a client.
    pub fn handle_inbound(&self, conn_id: &ConnectionId, raw_message: &str) {
        let Some(handle) = self.connections.get(conn_id).map(|h| h.clone()) else {
            warn!(conn_id = %conn_id, "Message from unknown connection");
            return;
        };

        let message: InboundMessage = match serde_json::from_str(raw_message) {
            Ok(m) => m,
            Err(e) => {
                handle.send(OutboundMessage::error("bad_message", format!("Invalid message: {e}")));
                return;
            }
        };

        match message {
            InboundMessage::Subscribe { channel } => self.subscribe(&handle, &channel),
            InboundMessage::Unsubscribe { channel } => {
                let removed = Channel::parse(&channel)
                    .map(|c| handle.remove_subscription(&c))
                    .unwrap_or(false);
                if removed {
                    handle.send(OutboundMessage::Unsubscribed { channel });
                }
            }
            InboundMessage::Pong { timestamp } => {
                debug!(conn_id = %conn_id, timestamp, "Pong");
            }
        }
    }

    fn subscribe(&self, handle: &Arc<ConnectionHandle>, name: &str) {
        let Some(channel) = Channel::parse(name) else {
            handle.send(OutboundMessage::error("unknown_channel", format!("Unknown channel '{name}'")));
            return;
        };
        if !channel.is_visible_to(handle.user_id, handle.role) {
            warn!(conn_id = %handle.id, user_id = %handle.user_id, channel = %channel, "Subscription denied");
            handle.send(OutboundMessage::error("forbidden", format!("Not allowed to join '{name}'")));
            return;
        }
        if handle.is_subscribed(&channel) {
            handle.send(OutboundMessage::Subscribed { channel: channel.to_string() });
            return;
        }
        if handle.subscription_count() >= self.config.max_subscriptions_per_connection {
            handle.send(OutboundMessage::error("too_many_subscriptions", "Subscription limit reached"));
            return;
        }
        self.attach(handle, channel);
    }

    fn attach(&self, handle: &Arc<ConnectionHandle>, channel: Channel) {
        let mut rx = self.pubsub.subscribe(channel);
        let target = Arc::downgrade(handle);
        let name = channel.to_string();
        let task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        let Some(conn) = target.upgrade() else { break };
                        if !conn.send(OutboundMessage::Event {
                            channel: name.clone(),
                            event,
                        }) {
                            debug!(conn_id = %conn.id, channel = %name, "Dropped event for slow connection");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(channel = %name, skipped, "Connection lagged behind channel");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        handle.add_subscription(channel, task.abort_handle());
        handle.send(OutboundMessage::Subscribed { channel: channel.to_string() });
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Close every connection.
    pub fn close_all(&self) {
        for entry in self.connections.iter() {
            entry.value().mark_closed();
        }
        self.connections.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasil_core::events::{DomainEvent, EventPayload, MailboxEvent};

    fn manager() -> (ConnectionManager, Arc<MemoryPubSub>) {
        let pubsub = Arc::new(MemoryPubSub::new(16));
        (ConnectionManager::new(RealtimeConfig::default(), pubsub.clone()), pubsub)
    }

    async fn next_event(rx: &mut mpsc::Receiver<OutboundMessage>) -> OutboundMessage {
        loop {
            let msg = rx.recv().await.unwrap();
            if !matches!(msg, OutboundMessage::Subscribed { .. }) {
                return msg;
            }
        }
    }

    #[tokio::test]
    async fn test_default_mailbox_channel_forwards() {
        let (mgr, pubsub) = manager();
        let user = Uuid::new_v4();
        let (_handle, mut rx) = mgr.register(user, UserRole::Customer);

        pubsub.publish(
            Channel::Mailbox(user),
            DomainEvent::new(
                None,
                EventPayload::Mailbox(MailboxEvent::NotificationRead {
                    notification_id: Uuid::new_v4(),
                    recipient_id: user,
                }),
            ),
        );
        match next_event(&mut rx).await {
            OutboundMessage::Event { channel, .. } => assert_eq!(channel, format!("mailbox:{user}")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_customer_cannot_join_admin_feed() {
        let (mgr, _) = manager();
        let (handle, mut rx) = mgr.register(Uuid::new_v4(), UserRole::Customer);
        mgr.handle_inbound(&handle.id, r#"{"type":"subscribe","channel":"admin:requests"}"#);
        match next_event(&mut rx).await {
            OutboundMessage::Error { code, .. } => assert_eq!(code, "forbidden"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!handle.is_subscribed(&Channel::AdminRequests));
    }

    #[tokio::test]
    async fn test_unregister_stops_forwarding() {
        let (mgr, _) = manager();
        let (handle, _rx) = mgr.register(Uuid::new_v4(), UserRole::Admin);
        assert_eq!(handle.subscription_count(), 2);
        mgr.unregister(&handle.id);
        assert_eq!(handle.subscription_count(), 0);
        assert!(!handle.is_alive());
        assert_eq!(mgr.connection_count(), 0);
    }
}
