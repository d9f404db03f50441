//! WebSocket connection lifecycle.

pub mod handle;
pub mod manager;

pub use handle::{ConnectionHandle, ConnectionId};
pub use manager::ConnectionManager;
