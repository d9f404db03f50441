//! # wasil-realtime
//!
//! Real-time engine for Wasil. Provides:
//!
//! - Typed channels per customer, dispatcher, mailbox, plus the admin feed
//! - In-memory pub/sub fed by the domain event bridge
//! - WebSocket connection management with per-role channel access
//! - Live request projections with explicit subscribe and teardown

pub mod bridge;
pub mod channel;
pub mod connection;
pub mod message;
pub mod projection;
pub mod server;

pub use bridge::{EventBridge, MemoryPubSub};
pub use channel::Channel;
pub use connection::ConnectionManager;
pub use message::{InboundMessage, OutboundMessage};
pub use projection::{LiveView, SubscriptionManager, ViewKey};
pub use server::RealtimeEngine;
