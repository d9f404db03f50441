//! Service catalog entities.

pub mod category;
pub mod offering;

pub use category::{Category, Priority};
pub use offering::{CUSTOM_SERVICE_ID, ServiceId, ServiceOffering, default_catalog};
