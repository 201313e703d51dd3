//! Error types for fermionic state operations

use thiserror::Error;

/// Errors that can occur while addressing, building or contracting
/// fermionic states
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FermiError {
    /// Orbital index out of range, duplicate orbital, or an occupation that
    /// does not agree with the declared particle numbers
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Bitstring with the wrong length or characters other than '0'/'1'
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Requested reduced density matrix rank is not implemented
    #[error("Reduced density matrix of rank {rank} is not supported, only rank 1 is")]
    NotSupported { rank: usize },

    /// Matrix or vector shape does not match the addressed dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Failure while encoding or decoding persisted data
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Failure while reading or writing persisted data
    #[error("I/O error: {0}")]
    Io(String),
}

impl FermiError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an invalid format error
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }
}

impl From<std::io::Error> for FermiError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for fermionic state operations
pub type Result<T> = std::result::Result<T, FermiError>;
