//! Media uploads attached to domain records.

pub mod service;

pub use service::{DispatcherMedia, MediaService, MediaTarget};
