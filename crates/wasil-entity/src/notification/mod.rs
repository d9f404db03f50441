//! Notification mailbox entities.

pub mod model;

pub use model::Notification;
