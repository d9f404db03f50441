//! Administrator reporting.

pub mod service;

pub use service::{AdminOverview, AdminService};
