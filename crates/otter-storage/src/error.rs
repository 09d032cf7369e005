//! Storage error types

use thiserror::Error;

/// Boxed error surfaced by a backing store.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// A key was supplied with a runtime type other than string
    #[error("Key must be a string, got {found}")]
    InvalidKeyType { found: &'static str },

    /// Failure reported by the backing store, passed through untouched
    #[error(transparent)]
    Backend(BackendError),

    #[error("Quota exceeded writing '{key}': needs {needed} bytes, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Unknown op: {0}")]
    UnknownOp(String),
}

impl StorageError {
    pub fn backend(err: impl Into<BackendError>) -> Self {
        StorageError::Backend(err.into())
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::backend(err)
    }
}
