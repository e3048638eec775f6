//! Result type alias

use crate::error::PhError;

/// Standard Result type for ProjectHub operations
pub type PhResult<T> = Result<T, PhError>;
