//! # wasil-core
//!
//! Core crate for Wasil. Contains configuration schemas, typed identifiers,
//! money and pagination types, domain events, the traits implemented by the
//! infrastructure crates, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Wasil crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
