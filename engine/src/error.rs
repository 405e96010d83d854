//! Error types for the contacts engine.

use crate::Field;
use thiserror::Error;

/// All possible errors from the contacts engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("invalid {field}: {reason}")]
    InvalidFormat { field: Field, reason: String },

    #[error("email already exists: {0}")]
    DuplicateEmail(String),

    // Lookup errors
    #[error("contact not found: {0}")]
    NotFound(String),

    // Persistence errors
    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("i/o error on '{path}': {message}")]
    Io { path: String, message: String },

    // State errors
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    // Wire code errors
    #[error("unknown field code: {0}")]
    UnknownField(i32),

    #[error("unknown backend code: {0}")]
    UnknownBackend(i32),
}

impl Error {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        Error::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// Whether the caller can recover by correcting its input.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Error::InvalidFormat { .. } | Error::DuplicateEmail(_) | Error::NotFound(_)
        )
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
