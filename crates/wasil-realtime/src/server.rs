//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tracing::info;

use wasil_core::config::RealtimeConfig;
use wasil_database::RequestStore;

use crate::bridge::{EventBridge, MemoryPubSub};
use crate::connection::ConnectionManager;
use crate::projection::SubscriptionManager;

/// Central real-time engine shared by the HTTP layer.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Pub/sub hub.
    pub pubsub: Arc<MemoryPubSub>,
    /// Domain events → channels. Hand this to the services as their publisher.
    pub event_bridge: Arc<EventBridge>,
    /// WebSocket connections.
    pub connections: Arc<ConnectionManager>,
    /// Live request views.
    pub projections: Arc<SubscriptionManager>,
    /// Configuration.
    pub config: RealtimeConfig,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("connections", &self.connections.connection_count())
            .field("views", &self.projections.open_count())
            .finish()
    }
}

impl RealtimeEngine {
    pub fn new(config: RealtimeConfig, requests: Arc<dyn RequestStore>) -> Self {
        let pubsub = Arc::new(MemoryPubSub::new(config.channel_buffer_size));
        let event_bridge = Arc::new(EventBridge::new(pubsub.clone()));
        let connections = Arc::new(ConnectionManager::new(config.clone(), pubsub.clone()));
        let projections = Arc::new(SubscriptionManager::new(requests, pubsub.clone()));

        info!("Real-time engine initialized");

        Self {
            pubsub,
            event_bridge,
            connections,
            projections,
            config,
        }
    }

    /// Close every connection and view.
    pub fn shutdown(&self) {
        info!("Shutting down real-time engine");
        self.connections.close_all();
        self.projections.close_all();
    }
}
