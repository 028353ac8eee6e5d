//! Error types for Latchkey core

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while building capture surfaces
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Grid rows, columns, width and height must all be positive
    #[error("Invalid grid geometry: {rows}x{columns} on {width}x{height}")]
    InvalidGeometry {
        rows: u32,
        columns: u32,
        width: u32,
        height: u32,
    },

    /// No pattern or PIN method is enabled in the preferences
    #[error("No credential method enabled")]
    NoCredentialMethod,

    /// The challenge could not be started or advanced
    #[error("Challenge error: {0}")]
    Challenge(#[from] ChallengeError),
}

/// Failure reported by a credential store implementation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Credential store unavailable: {0}")]
pub struct StoreError(pub String);

impl StoreError {
    /// Create a store error from any displayable cause
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self(message.to_string())
    }
}

/// Errors raised while submitting a code to a challenge
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChallengeError {
    /// The store could not answer; the challenge state is unchanged
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The challenge already ended with a successful enrollment or verification
    #[error("Challenge already completed")]
    SessionCompleted,
}
