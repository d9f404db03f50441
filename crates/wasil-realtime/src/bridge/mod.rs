//! Bridges between domain events and real-time channels.

pub mod event_bridge;
pub mod memory_pubsub;

pub use event_bridge::EventBridge;
pub use memory_pubsub::MemoryPubSub;
