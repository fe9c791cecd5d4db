//! Loading the booking CSV into a Polars DataFrame.

use std::path::{Path, PathBuf};

use booking_model::columns;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};
use crate::fingerprint::TableFingerprint;

/// How the CSV file is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Cell texts read as null in every column, in addition to empty fields.
    pub null_values: Vec<String>,
    /// Parse date-like text columns as dates.
    pub try_parse_dates: bool,
    /// Rows sampled for schema inference.
    pub infer_schema_length: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            null_values: vec!["NA".to_string()],
            try_parse_dates: true,
            infer_schema_length: 10_000,
        }
    }
}

impl IngestOptions {
    #[must_use]
    pub fn with_null_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_values = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_try_parse_dates(mut self, enabled: bool) -> Self {
        self.try_parse_dates = enabled;
        self
    }

    #[must_use]
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    fn polars_null_values(&self) -> Option<NullValues> {
        if self.null_values.is_empty() {
            return None;
        }
        let values: Vec<PlSmallStr> = self
            .null_values
            .iter()
            .map(|value| PlSmallStr::from(value.as_str()))
            .collect();
        Some(NullValues::AllColumns(values))
    }
}

/// A loaded booking table with its content identity.
///
/// The fields are private so the fingerprint always belongs to the frame it
/// travels with; a changed table is a new `SourceTable`.
#[derive(Debug, Clone)]
pub struct SourceTable {
    frame: DataFrame,
    fingerprint: TableFingerprint,
    path: Option<PathBuf>,
}

impl SourceTable {
    /// Wraps an in-memory table, fingerprinting its content.
    pub fn from_frame(frame: DataFrame) -> Self {
        let fingerprint = TableFingerprint::of_frame(&frame);
        Self {
            frame,
            fingerprint,
            path: None,
        }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn fingerprint(&self) -> &TableFingerprint {
        &self.fingerprint
    }

    /// File the table was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Expected source columns this table does not have.
    pub fn missing_columns(&self) -> Vec<&'static str> {
        columns::missing_expected(self.frame.get_column_names().into_iter().map(|n| n.as_str()))
    }
}

/// Reads a booking CSV file.
///
/// The fingerprint is taken over the raw file bytes, so re-reading an
/// unchanged file yields the same identity.
///
/// # Errors
///
/// Fails when the file is missing, unreadable, empty or not parseable CSV.
pub fn load_bookings(path: &Path, options: &IngestOptions) -> Result<SourceTable> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    let fingerprint = TableFingerprint::from_bytes(&bytes);
    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        fingerprint = fingerprint.short(),
        "read booking file"
    );

    let null_values = options.polars_null_values();
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(options.infer_schema_length))
        .map_parse_options(|opts| {
            opts.with_null_values(null_values.clone())
                .with_try_parse_dates(options.try_parse_dates)
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let table = SourceTable {
        frame,
        fingerprint,
        path: Some(path.to_path_buf()),
    };
    info!(
        path = %path.display(),
        rows = table.frame.height(),
        columns = table.frame.width(),
        fingerprint = table.fingerprint.short(),
        "loaded booking table"
    );
    let missing = table.missing_columns();
    if !missing.is_empty() {
        warn!(
            missing = %missing.join(", "),
            "booking table lacks expected columns; dependent features are disabled"
        );
    }
    Ok(table)
}
