//! Common error types for WealthSense.

use thiserror::Error;

/// Top-level error type for WealthSense operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed user input (wrong PIN length, confirm mismatch, etc.).
    #[error("Validation error: {0}")]
    Validation(String),

    /// PIN verification failed.
    ///
    /// Carries no detail; a failed unlock must not reveal how close
    /// the attempt was.
    #[error("Invalid PIN")]
    InvalidPin,

    /// Operation not permitted in the current state.
    #[error("Not permitted: {0}")]
    NotPermitted(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document store operation failed.
    #[error("Store error: {0}")]
    Store(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
