//! Error types for the connectivity client.

use atlas_common::TransferError;
use nrrd_parser::NrrdError;
use thiserror::Error;

use crate::centroid::CentroidError;

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by `MouseConnectivityApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or file transfer failure, passed through untouched.
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// The service answered with `success: false`.
    #[error("query failed: {0}")]
    Query(String),

    /// The body was JSON but not an RMA envelope of the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A lookup that must return at least one row returned none.
    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Nrrd(#[from] NrrdError),

    #[error(transparent)]
    Centroid(#[from] CentroidError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
