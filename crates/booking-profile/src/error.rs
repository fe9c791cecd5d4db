//! Error types for profiling.

use booking_model::ModelError;
use thiserror::Error;

/// Errors raised while profiling a booking table.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Profile options rejected by the model.
    #[error(transparent)]
    Options(#[from] ModelError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for ProfileError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for profiling operations.
pub type Result<T> = std::result::Result<T, ProfileError>;
