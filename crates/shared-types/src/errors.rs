//! # Error Types
//!
//! Errors raised while encoding or decoding shared entities.

use thiserror::Error;

/// Errors from canonical serialization and hex decoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypesError {
    /// Canonical serialization of a reading failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Input was not valid hexadecimal.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded value has the wrong byte length.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
