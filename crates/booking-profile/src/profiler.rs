//! Per-column descriptive summaries.
//!
//! Each column is profiled on its own: the kind of the column decides which
//! fields are filled, and no state is shared between columns. Counts,
//! distinct values and statistics come from Polars over the cleaned column.

use booking_ingest::{any_to_string, clean_series};
use booking_model::{
    ColumnKind, ColumnSummary, DatasetProfile, ProfileOptions, TemporalRange, ValueCount,
};
use polars::prelude::*;
use tracing::{debug, info};

use crate::error::Result;
use crate::stats::{numeric_stats, round2};

/// Semantic kind of a Polars storage type.
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64 => ColumnKind::Numeric,
        DataType::Boolean => ColumnKind::Boolean,
        other if other.is_temporal() => ColumnKind::Temporal,
        _ => ColumnKind::Text,
    }
}

/// Profiles every column of `df`, in column order.
///
/// # Errors
///
/// Fails when the options are invalid or Polars cannot read a column; an
/// empty table profiles to zero counts.
pub fn profile_table(df: &DataFrame, options: &ProfileOptions) -> Result<DatasetProfile> {
    options.validate()?;
    let rows = df.height();
    let summaries = df
        .get_columns()
        .iter()
        .map(|column| profile_column(column, options))
        .collect::<Result<Vec<ColumnSummary>>>()?;
    info!(rows, columns = summaries.len(), "profiled table");
    Ok(DatasetProfile {
        rows,
        columns: summaries.len(),
        summaries,
    })
}

/// Profiles one column.
///
/// # Errors
///
/// Fails when Polars cannot clean, cast or count the column.
pub fn profile_column(column: &Column, options: &ProfileOptions) -> Result<ColumnSummary> {
    let kind = column_kind(column.dtype());
    let rows = column.len();
    let present = clean_series(column)?.drop_nulls();
    let non_null = present.len();

    let numeric = match kind {
        ColumnKind::Numeric => {
            let values = present.cast(&DataType::Float64)?;
            numeric_stats(values.f64()?)
        }
        _ => None,
    };

    let counts = value_counts(&present)?;
    let unique = counts.len();
    let temporal = match kind {
        ColumnKind::Temporal => temporal_range(&counts),
        _ => None,
    };
    let categorical_like = matches!(kind, ColumnKind::Text | ColumnKind::Temporal)
        || unique < options.categorical_threshold;
    let top_values = categorical_like.then(|| top_values(counts, options.top_values));

    debug!(
        column = %column.name(),
        kind = %kind,
        non_null,
        unique,
        "profiled column"
    );

    Ok(ColumnSummary {
        name: column.name().to_string(),
        dtype: column.dtype().to_string(),
        kind,
        non_null,
        null_pct: null_percent(rows, non_null),
        unique,
        numeric,
        temporal,
        top_values,
    })
}

/// Percentage of missing cells, rounded to two decimals; 0 for no rows.
pub fn null_percent(rows: usize, non_null: usize) -> f64 {
    if rows == 0 {
        return 0.0;
    }
    round2(rows.saturating_sub(non_null) as f64 / rows as f64 * 100.0)
}

/// Occurrences of each distinct value of a null-free series.
fn value_counts(present: &Series) -> Result<Vec<ValueCount>> {
    if present.is_empty() {
        return Ok(Vec::new());
    }
    let count_name = format!("{}_count", present.name());
    let table = present.value_counts(false, false, count_name.into(), false)?;
    let (Some(values), Some(counts)) = (table.get_columns().first(), table.get_columns().get(1))
    else {
        return Ok(Vec::new());
    };
    let counts = counts.cast(&DataType::UInt64)?;
    counts
        .as_materialized_series()
        .u64()?
        .iter()
        .enumerate()
        .map(|(idx, count)| {
            Ok(ValueCount {
                value: any_to_string(values.get(idx)?),
                count: count.unwrap_or_default() as usize,
            })
        })
        .collect()
}

/// Most frequent values; ties go to the smaller value text.
fn top_values(mut counts: Vec<ValueCount>, limit: usize) -> Vec<ValueCount> {
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    counts.truncate(limit);
    counts
}

/// ISO renderings of dates and datetimes order chronologically as text.
fn temporal_range(counts: &[ValueCount]) -> Option<TemporalRange> {
    let values = counts.iter().map(|entry| entry.value.as_str());
    Some(TemporalRange {
        min: values.clone().min()?.to_string(),
        max: values.max()?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn kinds_follow_storage_type() {
        assert_eq!(column_kind(&DataType::Int64), ColumnKind::Numeric);
        assert_eq!(column_kind(&DataType::Float64), ColumnKind::Numeric);
        assert_eq!(column_kind(&DataType::Boolean), ColumnKind::Boolean);
        assert_eq!(column_kind(&DataType::Date), ColumnKind::Temporal);
        assert_eq!(column_kind(&DataType::String), ColumnKind::Text);
    }

    #[test]
    fn null_percent_handles_empty_tables() {
        assert_eq!(null_percent(0, 0), 0.0);
        assert_eq!(null_percent(3, 2), 33.33);
        assert_eq!(null_percent(4, 0), 100.0);
    }

    #[test]
    fn ties_are_broken_by_value() {
        let column = Series::new("meal".into(), ["SC", "BB", "HB", "BB", "SC", "FB"]).into_column();
        let summary = profile_column(&column, &ProfileOptions::default()).unwrap();
        assert_eq!(summary.top_values_display(), "BB (2); SC (2); FB (1)");
    }

    #[test]
    fn whitespace_counts_as_missing() {
        let column = Series::new("country".into(), ["PRT", "   ", "GBR"]).into_column();
        let summary = profile_column(&column, &ProfileOptions::default()).unwrap();
        assert_eq!(summary.non_null, 2);
        assert_eq!(summary.null_pct, 33.33);
        assert_eq!(summary.unique, 2);
    }

    #[test]
    fn nan_is_missing_for_counts_and_statistics() {
        let column = Series::new("adr".into(), [f64::NAN, f64::NAN, f64::NAN]).into_column();
        let summary = profile_column(&column, &ProfileOptions::default()).unwrap();
        assert_eq!(summary.non_null, 0);
        assert_eq!(summary.null_pct, 100.0);
        assert_eq!(summary.unique, 0);
        assert!(summary.numeric.is_none());
        assert_eq!(summary.top_values_display(), "");

        let mixed = Series::new("adr".into(), [f64::NAN, 80.0, 80.0, 95.5]).into_column();
        let summary = profile_column(&mixed, &ProfileOptions::default()).unwrap();
        assert_eq!(summary.non_null, 3);
        assert_eq!(summary.unique, 2);
        assert_eq!(summary.numeric.unwrap().mean, 85.17);
        assert_eq!(summary.top_values_display(), "80 (2); 95.5 (1)");
    }

    #[test]
    fn booleans_get_counts_but_no_statistics() {
        let column = Series::new("is_repeated_guest".into(), [true, false, false]).into_column();
        let summary = profile_column(&column, &ProfileOptions::default()).unwrap();
        assert_eq!(summary.kind, ColumnKind::Boolean);
        assert!(summary.numeric.is_none());
        assert_eq!(summary.top_values_display(), "false (2); true (1)");
    }

    #[test]
    fn high_cardinality_numbers_have_no_top_values() {
        let values: Vec<i64> = (0..60).collect();
        let column = Series::new("lead_time".into(), values).into_column();
        let summary = profile_column(&column, &ProfileOptions::default()).unwrap();
        assert_eq!(summary.unique, 60);
        assert!(summary.numeric.is_some());
        assert!(summary.top_values.is_none());

        let wide = ProfileOptions::default().with_categorical_threshold(100);
        assert!(profile_column(&column, &wide).unwrap().top_values.is_some());
    }
}
