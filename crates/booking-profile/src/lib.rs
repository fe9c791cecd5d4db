//! Schema-aware column profiler.
//!
//! Produces one summary row per column whatever its type, plus duplicate
//! detection and category listings for data-quality review.

pub mod categories;
pub mod duplicates;
pub mod error;
pub mod profiler;
pub mod stats;

pub use categories::{CategoryValues, list_categories};
pub use duplicates::detect_duplicates;
pub use error::{ProfileError, Result};
pub use profiler::{column_kind, null_percent, profile_column, profile_table};
