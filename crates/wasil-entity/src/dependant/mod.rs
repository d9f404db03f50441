//! Dependant (care recipient) entities.

pub mod location;
pub mod model;

pub use location::Location;
pub use model::{CreateDependant, Dependant, Gender, UpdateDependant};
