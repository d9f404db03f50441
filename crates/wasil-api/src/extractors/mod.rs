//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod pagination;
pub mod validated;

pub use auth::AuthUser;
pub use json::ApiJson;
pub use pagination::PaginationParams;
pub use validated::ValidatedJson;
