//! Error types for feature derivation.

use thiserror::Error;

/// Errors raised while deriving booking features.
#[derive(Debug, Error)]
pub enum DeriveError {
    /// An arrival date could not be built and the options reject such rows.
    #[error("invalid arrival date at row {row}: {detail}")]
    InvalidDate { row: usize, detail: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for DeriveError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for derivation operations.
pub type Result<T> = std::result::Result<T, DeriveError>;
