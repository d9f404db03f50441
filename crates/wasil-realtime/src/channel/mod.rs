//! Channel naming and access rules.

pub mod types;

pub use types::Channel;
