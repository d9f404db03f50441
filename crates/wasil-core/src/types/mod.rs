//! Core type definitions used across the Wasil workspace.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::Money;
pub use pagination::{PageRequest, PageResponse};
