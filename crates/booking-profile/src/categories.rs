//! Distinct values of textual columns.

use booking_ingest::{any_to_string, clean_series};
use booking_model::ColumnKind;
use polars::prelude::{DataFrame, PolarsResult};
use serde::Serialize;

use crate::error::Result;
use crate::profiler::column_kind;

/// The sorted distinct values of one textual column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryValues {
    pub column: String,
    pub values: Vec<String>,
}

/// Lists the distinct values of every textual column, in column order.
///
/// # Errors
///
/// Fails when Polars cannot deduplicate a column.
pub fn list_categories(df: &DataFrame) -> Result<Vec<CategoryValues>> {
    df.get_columns()
        .iter()
        .filter(|column| column_kind(column.dtype()) == ColumnKind::Text)
        .map(|column| {
            let distinct = clean_series(column)?.drop_nulls().unique()?;
            let mut values = (0..distinct.len())
                .map(|idx| distinct.get(idx).map(any_to_string))
                .collect::<PolarsResult<Vec<String>>>()?;
            values.sort_unstable();
            Ok(CategoryValues {
                column: column.name().to_string(),
                values,
            })
        })
        .collect()
}
