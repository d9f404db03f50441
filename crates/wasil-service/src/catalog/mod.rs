//! Service catalog with customer-facing quotes.

pub mod service;

pub use service::{CatalogEntry, CatalogService};
