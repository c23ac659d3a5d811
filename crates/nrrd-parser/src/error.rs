//! Error types for NRRD parsing.

use thiserror::Error;

/// Result type for NRRD parser operations.
pub type NrrdResult<T> = Result<T, NrrdError>;

/// Error types for NRRD parsing.
#[derive(Error, Debug)]
pub enum NrrdError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// First line is not an NRRD magic
    #[error("not an NRRD file: {0}")]
    InvalidMagic(String),

    /// Required header field absent
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Header field present but unparseable
    #[error("invalid value for field '{field}': {value}")]
    InvalidField { field: String, value: String },

    /// Valid NRRD that this reader does not handle
    #[error("unsupported NRRD feature: {0}")]
    Unsupported(String),

    /// Payload does not match the header
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl NrrdError {
    pub(crate) fn invalid_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }
}
