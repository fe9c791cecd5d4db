//! Booking table ingestion.
//!
//! Reads the bookings CSV into a Polars DataFrame, fingerprints its content
//! and provides the cell-access helpers the other crates read values with.

pub mod error;
pub mod fingerprint;
pub mod loader;
pub mod polars_utils;

pub use error::{IngestError, Result};
pub use fingerprint::TableFingerprint;
pub use loader::{IngestOptions, SourceTable, load_bookings};
pub use polars_utils::{
    NumericCell, any_to_numeric, any_to_string, any_to_string_non_empty, clean_frame,
    clean_series, column_numeric, column_text, float_values, format_numeric, frame_numeric,
    frame_text, frame_values,
};
