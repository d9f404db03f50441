//! Live request projections.
//!
//! A view is loaded once from the store and then kept current from the
//! change feed. Views are eventually consistent and ignore stale updates.

pub mod manager;
pub mod view;

pub use manager::SubscriptionManager;
pub use view::{LiveView, ViewKey};
