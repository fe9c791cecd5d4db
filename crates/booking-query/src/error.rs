//! Error types for filtering and aggregation.

use booking_model::ModelError;
use thiserror::Error;

/// Errors raised while querying an enriched booking table.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Filter criteria or options rejected by the model.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Preset name not recognized.
    #[error("unknown breakdown preset: {name}")]
    UnknownPreset { name: String },

    /// Breakdown request that cannot be evaluated.
    #[error("invalid breakdown: {message}")]
    InvalidBreakdown { message: String },

    /// A sort order refers to a metric the breakdown does not compute.
    #[error("sort refers to metric {index}, but the breakdown has {available}")]
    MetricIndex { index: usize, available: usize },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for QueryError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
