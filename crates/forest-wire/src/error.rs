//! Error types for the wire codec.

use thiserror::Error;

/// Result type for wire codec operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors raised while decoding a QVM response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// A fixed-width primitive was handed the wrong number of bytes.
    ///
    /// This points at a layout computation bug, not at bad server data.
    #[error("Invalid input length: expected {expected} bytes, got {actual}")]
    InvalidInputLength { expected: usize, actual: usize },

    /// Rounding to a multiple of zero.
    #[error("Division by zero: cannot round up to a multiple of 0")]
    DivisionByZero,

    /// The response does not fit the expected memory + wavefunction layout.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl WireError {
    /// Shorthand for a [`WireError::MalformedResponse`].
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}
