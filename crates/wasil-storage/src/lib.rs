//! # wasil-storage
//!
//! Object storage for uploaded media (dependant photos, dispatcher portraits,
//! field photos and working videos). The local filesystem provider is used
//! in deployments; the memory provider backs tests.

pub mod manager;
pub mod providers;

pub use manager::{MediaKind, MediaObject, StorageManager, content_type_for};
