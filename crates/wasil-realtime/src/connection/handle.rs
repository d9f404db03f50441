//! Individual WebSocket connection handle.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use uuid::Uuid;

use wasil_entity::user::UserRole;

use crate::channel::Channel;
use crate::message::OutboundMessage;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// A handle to a single WebSocket connection.
///
/// Holds the sender for pushing messages to the client and one forwarding
/// task per subscribed channel.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// User who owns this connection
    pub user_id: Uuid,
    /// User's role (cached for access checks)
    pub role: UserRole,
    /// Sender for outbound messages
    pub sender: mpsc::Sender<OutboundMessage>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    subscriptions: Mutex<HashMap<Channel, AbortHandle>>,
    alive: AtomicBool,
}

impl ConnectionHandle {
    pub fn new(user_id: Uuid, role: UserRole, sender: mpsc::Sender<OutboundMessage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            role,
            sender,
            connected_at: Utc::now(),
            subscriptions: Mutex::new(HashMap::new()),
            alive: AtomicBool::new(true),
        }
    }

    /// Queue a message for this connection. Returns `false` when it was dropped.
    pub fn send(&self, msg: OutboundMessage) -> bool {
        self.is_alive() && self.sender.try_send(msg).is_ok()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Mark closed and stop every forwarding task.
    pub fn mark_closed(&self) {
        self.alive.store(false, Ordering::Relaxed);
        if let Ok(mut subs) = self.subscriptions.lock() {
            for (_, task) in subs.drain() {
                task.abort();
            }
        }
    }

    pub fn is_subscribed(&self, channel: &Channel) -> bool {
        self.subscriptions
            .lock()
            .map(|subs| subs.contains_key(channel))
            .unwrap_or(false)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().map(|subs| subs.len()).unwrap_or(0)
    }

    pub fn channels(&self) -> Vec<Channel> {
        self.subscriptions
            .lock()
            .map(|subs| subs.keys().copied().collect())
            .unwrap_or_default()
    }

    pub(crate) fn add_subscription(&self, channel: Channel, task: AbortHandle) {
        if let Ok(mut subs) = self.subscriptions.lock() {
            if let Some(previous) = subs.insert(channel, task) {
                previous.abort();
            }
        }
    }

    pub(crate) fn remove_subscription(&self, channel: &Channel) -> bool {
        match self.subscriptions.lock() {
            Ok(mut subs) => match subs.remove(channel) {
                Some(task) => {
                    task.abort();
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }
}
