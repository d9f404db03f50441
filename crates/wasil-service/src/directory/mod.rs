//! Dispatcher directory.

pub mod service;

pub use service::DispatcherDirectory;
