//! Convenience result type alias for Wasil.

use crate::error::AppError;

/// A specialized `Result` type for Wasil operations.
pub type AppResult<T> = Result<T, AppError>;
