//! Dependant profiles.

pub mod service;

pub use service::DependantService;
