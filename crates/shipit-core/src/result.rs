//! Convenience result type alias for shipit.

use crate::error::AppError;

/// A specialized `Result` type for shipit operations.
pub type AppResult<T> = Result<T, AppError>;
