//! Store errors

use ph_core::error::PhError;
use ph_core::traits::Id;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Id },

    #[error("{collection} document {id} already exists")]
    Duplicate { collection: String, id: Id },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for PhError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => PhError::not_found(entity, id),
            StoreError::Duplicate { .. } => PhError::conflict(err.to_string()),
            StoreError::Database(e) => PhError::Database(e.to_string()),
            StoreError::Serialization(e) => PhError::Internal(e.to_string()),
        }
    }
}
