//! Error types for the QVM adapter.

use forest_wire::WireError;
use thiserror::Error;

/// Result type for QVM operations.
pub type QvmResult<T> = Result<T, QvmError>;

/// Errors that can occur when talking to the QVM.
#[derive(Debug, Error)]
pub enum QvmError {
    /// No API key configured.
    #[error("Missing API key: call set_api_key or set FOREST_API_KEY")]
    MissingApiKey,

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The QVM answered with a non-success status.
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The binary wavefunction body could not be decoded.
    #[error("Wire error: {0}")]
    Wire(#[from] WireError),

    /// The response carried no Content-Length.
    #[error("Malformed response: missing content length")]
    MissingContentLength,

    /// A structured response did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A caller-supplied argument is out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Coarse error classes. None of them is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required credential or setting is absent or unreadable.
    Configuration,
    /// Network failure or non-success status.
    Transport,
    /// The response does not match the expected layout or shape.
    MalformedResponse,
    /// A fixed-width decode primitive got the wrong byte count.
    InvalidInputLength,
    /// The caller passed an unusable argument.
    InvalidArgument,
}

impl QvmError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingApiKey | Self::Config(_) => ErrorKind::Configuration,
            Self::Http(_) | Self::ApiError { .. } => ErrorKind::Transport,
            Self::Json(_)
            | Self::MissingContentLength
            | Self::MalformedResponse(_)
            | Self::Wire(WireError::MalformedResponse(_)) => ErrorKind::MalformedResponse,
            Self::Wire(WireError::InvalidInputLength { .. } | WireError::DivisionByZero) => {
                ErrorKind::InvalidInputLength
            }
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }
}
