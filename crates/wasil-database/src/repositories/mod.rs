//! PostgreSQL repository implementations of the store traits.

pub mod dependant;
pub mod dispatcher;
pub mod notification;
pub mod request;
pub mod user;

pub use dependant::DependantRepository;
pub use dispatcher::DispatcherRepository;
pub use notification::NotificationRepository;
pub use request::RequestRepository;
pub use user::UserRepository;

use wasil_core::error::{AppError, ErrorKind};

/// Map a sqlx error into a persistence failure with context.
pub(crate) fn persistence(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Persistence, message, e)
}
