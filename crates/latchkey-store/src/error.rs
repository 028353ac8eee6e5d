//! Error types for Latchkey storage

use latchkey_core::StoreError;
use thiserror::Error;

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while reading or writing persisted state
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Unsupported document version
    #[error("Unsupported credential format version {0}")]
    UnsupportedVersion(u32),

    /// Hashing backend rejected its parameters
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Store was switched off (used to exercise failure paths)
    #[error("Store unavailable")]
    Unavailable,
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

impl From<StorageError> for StoreError {
    fn from(e: StorageError) -> Self {
        StoreError::new(e)
    }
}
