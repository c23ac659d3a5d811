//! Error type shared by everything that moves bytes over HTTP.

use thiserror::Error;

/// Result type alias using TransferError.
pub type TransferResult<T> = Result<T, TransferError>;

/// Failure while fetching a URL or writing its body to disk.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid response body from {url}: {message}")]
    Body { url: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransferError {
    /// Create a Request error.
    pub fn request(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Request {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a Body error.
    pub fn body(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Body {
            url: url.into(),
            message: message.into(),
        }
    }

    /// HTTP status for Status errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransferError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
