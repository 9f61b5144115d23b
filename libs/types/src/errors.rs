//! Error types for identifier and amount parsing

use thiserror::Error;

/// Errors raised when raw bytes or text cannot be turned into a typed value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}
