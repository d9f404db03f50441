//! Real-time change feed configuration.

use serde::{Deserialize, Serialize};

/// Real-time (change subscription) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Buffer size of each broadcast channel.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// WebSocket ping interval in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Maximum channel subscriptions per WebSocket connection.
    #[serde(default = "default_max_subscriptions")]
    pub max_subscriptions_per_connection: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            ping_interval_seconds: default_ping_interval(),
            max_subscriptions_per_connection: default_max_subscriptions(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_ping_interval() -> u64 {
    30
}

fn default_max_subscriptions() -> usize {
    8
}
