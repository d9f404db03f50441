//! Dispatcher directory entities.

pub mod model;

pub use model::{CreateDispatcher, Dispatcher};
