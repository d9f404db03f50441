//! User domain entities.

pub mod model;
pub mod plan;
pub mod role;

pub use model::{CreateUser, UpdateProfile, User};
pub use plan::SubscriptionPlan;
pub use role::UserRole;
