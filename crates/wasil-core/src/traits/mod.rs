//! Core traits defined in `wasil-core` and implemented by other crates.

pub mod events;
pub mod storage;

pub use events::{EventPublisher, NullEventPublisher};
pub use storage::StorageProvider;
