//! The request lifecycle: create, assign, advance, cancel.

pub mod controller;
mod events;
mod messages;

pub use controller::{CreateRequestInput, DEFAULT_OPERATIONS_REASON, RequestLifecycle};
