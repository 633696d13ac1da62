//! Storage error types.
//!
//! Repositories return [`StorageError`]; the service layer lifts it into
//! [`SentinelError`] at the crate boundary.

use sentinel_core::SentinelError;
use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Maps a unique-constraint failure on insert to [`StorageError::AlreadyExists`].
    pub(crate) fn on_insert(err: sqlx::Error, id: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StorageError::AlreadyExists(id.to_string())
            }
            _ => StorageError::Database(err),
        }
    }
}

impl From<StorageError> for SentinelError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::AlreadyExists(id) => {
                SentinelError::Validation(format!("message id already stored: {}", id))
            }
            other => SentinelError::StoreUnavailable(other.to_string()),
        }
    }
}
