//! Grouped metrics over a filtered table.
//!
//! A [`Breakdown`] names up to two grouping dimensions and the metrics to
//! compute per group. Records missing a value in any grouping dimension
//! are dropped; groups without records never appear. Grouping runs as a
//! Polars `group_by` over the cleaned columns; only the small result is
//! sorted here.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use booking_ingest::{any_to_numeric, any_to_string, clean_frame};
use booking_model::{BookingStatus, columns};
use booking_profile::stats::round2;
use polars::prelude::{
    AnyValue, Column, DataFrame, DataType, Expr, IntoLazy, NamedFrom, Series, col, len, lit,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{QueryError, Result};
use crate::ordering::{compare_in_dimension, compare_keys, has_semantic_order};

/// A value computed per group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Number of canceled records.
    Cancellations,
    /// Share of canceled records, in percent.
    CancellationRate,
    /// `100 - CancellationRate`.
    CompletionRate,
    Mean(String),
    Median(String),
    Sum(String),
}

impl Metric {
    pub fn mean(column: impl Into<String>) -> Self {
        Self::Mean(column.into())
    }

    pub fn median(column: impl Into<String>) -> Self {
        Self::Median(column.into())
    }

    pub fn sum(column: impl Into<String>) -> Self {
        Self::Sum(column.into())
    }

    /// Column name used for this metric in results.
    pub fn label(&self) -> String {
        match self {
            Self::Cancellations => "cancellations".to_string(),
            Self::CancellationRate => "cancellation_rate".to_string(),
            Self::CompletionRate => "completion_rate".to_string(),
            Self::Mean(column) => format!("mean_{column}"),
            Self::Median(column) => format!("median_{column}"),
            Self::Sum(column) => format!("sum_{column}"),
        }
    }

    /// Source column the metric reads.
    pub fn source(&self) -> &str {
        match self {
            Self::Cancellations | Self::CancellationRate | Self::CompletionRate => {
                columns::IS_CANCELED
            }
            Self::Mean(column) | Self::Median(column) | Self::Sum(column) => column,
        }
    }

    /// Per-group aggregation; values are rounded after collection.
    fn expr(&self) -> Expr {
        let value = col(self.source()).cast(DataType::Float64);
        match self {
            Self::Cancellations | Self::Sum(_) => value.sum(),
            Self::CancellationRate => value.mean() * lit(100.0),
            Self::CompletionRate => lit(100.0) - value.mean() * lit(100.0),
            Self::Mean(_) => value.mean(),
            Self::Median(_) => value.median(),
        }
    }
}

/// Restricts which records enter the aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowConstraint {
    AtMost { column: String, limit: f64 },
    GreaterThan { column: String, limit: f64 },
}

impl RowConstraint {
    pub fn at_most(column: impl Into<String>, limit: f64) -> Self {
        Self::AtMost {
            column: column.into(),
            limit,
        }
    }

    pub fn greater_than(column: impl Into<String>, limit: f64) -> Self {
        Self::GreaterThan {
            column: column.into(),
            limit,
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Self::AtMost { column, .. } | Self::GreaterThan { column, .. } => column,
        }
    }

    fn expr(&self) -> Expr {
        let value = col(self.column()).cast(DataType::Float64);
        match self {
            Self::AtMost { limit, .. } => value.lt_eq(lit(*limit)),
            Self::GreaterThan { limit, .. } => value.gt(lit(*limit)),
        }
    }
}

/// Order of result rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Fixed order for seasons, buckets, bands and months; otherwise by
    /// descending count.
    #[default]
    Presentation,
    CountDesc,
    /// Keys ascending, numerically when they are numbers.
    KeyAsc,
    /// Descending by the metric at this index.
    MetricDesc(usize),
}

/// One aggregation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub constraints: Vec<RowConstraint>,
    /// Keep only the most frequent values of the first dimension.
    #[serde(default)]
    pub top: Option<usize>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl Breakdown {
    /// Counts per value of one dimension.
    pub fn by(dimension: impl Into<String>) -> Self {
        Self {
            dimensions: vec![dimension.into()],
            metrics: Vec::new(),
            constraints: Vec::new(),
            top: None,
            sort: SortOrder::default(),
        }
    }

    /// Adds a second grouping dimension.
    #[must_use]
    pub fn then_by(mut self, dimension: impl Into<String>) -> Self {
        self.dimensions.push(dimension.into());
        self
    }

    #[must_use]
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: RowConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    #[must_use]
    pub fn with_top(mut self, count: usize) -> Self {
        self.top = Some(count);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.dimensions.is_empty() || self.dimensions.len() > 2 {
            return Err(QueryError::InvalidBreakdown {
                message: format!(
                    "expected one or two dimensions, got {}",
                    self.dimensions.len()
                ),
            });
        }
        if let SortOrder::MetricDesc(index) = self.sort
            && index >= self.metrics.len()
        {
            return Err(QueryError::MetricIndex {
                index,
                available: self.metrics.len(),
            });
        }
        Ok(())
    }
}

/// One group of an aggregation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub keys: Vec<String>,
    pub count: usize,
    /// Metric values in the order of the breakdown's metrics.
    pub values: Vec<Option<f64>>,
}

/// Groups with their counts and metrics, already sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub rows: Vec<GroupRow>,
}

impl AggregationResult {
    fn empty(breakdown: &Breakdown) -> Self {
        Self {
            dimensions: breakdown.dimensions.clone(),
            metrics: breakdown.metrics.iter().map(Metric::label).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Records covered by all groups.
    pub fn total_count(&self) -> usize {
        self.rows.iter().map(|row| row.count).sum()
    }

    /// The group with exactly these keys.
    pub fn find(&self, keys: &[&str]) -> Option<&GroupRow> {
        self.rows
            .iter()
            .find(|row| row.keys.iter().map(String::as_str).eq(keys.iter().copied()))
    }

    /// Value of the named metric for the group with these keys.
    pub fn value(&self, keys: &[&str], metric: &str) -> Option<f64> {
        let index = self.metrics.iter().position(|label| label == metric)?;
        self.find(keys)?.values[index]
    }

    /// Key columns, then `count`, then one column per metric.
    ///
    /// # Errors
    ///
    /// Fails when Polars rejects the columns.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut frame_columns: Vec<Column> = Vec::new();
        for (index, dimension) in self.dimensions.iter().enumerate() {
            let keys: Vec<&str> = self.rows.iter().map(|row| row.keys[index].as_str()).collect();
            frame_columns.push(Series::new(dimension.as_str().into(), keys).into());
        }
        let counts: Vec<u64> = self.rows.iter().map(|row| row.count as u64).collect();
        frame_columns.push(Series::new("count".into(), counts).into());
        for (index, metric) in self.metrics.iter().enumerate() {
            let values: Vec<Option<f64>> = self.rows.iter().map(|row| row.values[index]).collect();
            frame_columns.push(Series::new(metric.as_str().into(), values).into());
        }
        Ok(DataFrame::new(frame_columns)?)
    }
}

const COUNT_ALIAS: &str = "__count";

/// Runs a breakdown over `df`.
///
/// A missing grouping column yields an empty result; a missing constraint
/// or metric column is skipped. Each case is logged at `warn`.
///
/// # Errors
///
/// Fails when the breakdown itself is malformed or Polars cannot evaluate
/// it.
pub fn aggregate(df: &DataFrame, breakdown: &Breakdown) -> Result<AggregationResult> {
    breakdown.validate()?;
    if let Some(missing) = breakdown
        .dimensions
        .iter()
        .find(|dimension| df.column(dimension).is_err())
    {
        warn!(column = %missing, "grouping column missing; nothing to aggregate");
        return Ok(AggregationResult::empty(breakdown));
    }

    let mut referenced: Vec<&str> = breakdown.dimensions.iter().map(String::as_str).collect();
    let mut keep: Vec<Expr> = breakdown
        .dimensions
        .iter()
        .map(|dimension| col(dimension.as_str()).is_not_null())
        .collect();
    for constraint in &breakdown.constraints {
        if df.column(constraint.column()).is_ok() {
            keep.push(constraint.expr());
            referenced.push(constraint.column());
        } else {
            warn!(
                column = constraint.column(),
                "constraint column missing; constraint skipped"
            );
        }
    }

    let mut aggregations = vec![len().alias(COUNT_ALIAS)];
    let mut metric_aliases: Vec<Option<String>> = Vec::with_capacity(breakdown.metrics.len());
    for (index, metric) in breakdown.metrics.iter().enumerate() {
        if df.column(metric.source()).is_ok() {
            let alias = format!("__metric_{index}");
            aggregations.push(metric.expr().alias(alias.as_str()));
            referenced.push(metric.source());
            metric_aliases.push(Some(alias));
        } else {
            warn!(column = metric.source(), metric = %metric.label(), "metric column missing");
            metric_aliases.push(None);
        }
    }

    let mut lazy = clean_frame(df, &referenced)?.lazy();
    if let Some(keep) = keep.into_iter().reduce(|all, next| all.and(next)) {
        lazy = lazy.filter(keep);
    }
    let keys: Vec<Expr> = breakdown
        .dimensions
        .iter()
        .map(|dimension| col(dimension.as_str()))
        .collect();
    let grouped = lazy.group_by(keys).agg(aggregations).collect()?;

    let key_columns = breakdown
        .dimensions
        .iter()
        .map(|dimension| key_texts(&grouped, dimension))
        .collect::<Result<Vec<_>>>()?;
    let counts = group_counts(&grouped)?;
    let metric_columns = metric_aliases
        .iter()
        .map(|alias| alias.as_deref().map(|name| float_column(&grouped, name)).transpose())
        .collect::<Result<Vec<_>>>()?;

    let mut rows: Vec<GroupRow> = (0..grouped.height())
        .map(|idx| GroupRow {
            keys: key_columns.iter().map(|keys| keys[idx].clone()).collect(),
            count: counts[idx],
            values: metric_columns
                .iter()
                .map(|values| values.as_ref().and_then(|values| values[idx]).map(round2))
                .collect(),
        })
        .collect();

    if let Some(limit) = breakdown.top {
        let leaders = leading_keys(&rows, limit);
        rows.retain(|row| leaders.contains(&row.keys[0]));
    }

    sort_rows(&mut rows, &breakdown.dimensions, breakdown.sort);
    debug!(
        dimensions = ?breakdown.dimensions,
        groups = rows.len(),
        "aggregated"
    );

    Ok(AggregationResult {
        dimensions: breakdown.dimensions.clone(),
        metrics: breakdown.metrics.iter().map(Metric::label).collect(),
        rows,
    })
}

/// Display text of a group key. Cancellation flags read as their status.
fn key_label(dimension: &str, value: AnyValue<'_>) -> String {
    let status = (dimension == columns::IS_CANCELED)
        .then(|| any_to_numeric(value.clone()).value())
        .flatten()
        .and_then(BookingStatus::from_flag);
    match status {
        Some(status) => status.label().to_string(),
        None => any_to_string(value),
    }
}

fn key_texts(grouped: &DataFrame, dimension: &str) -> Result<Vec<String>> {
    let column = grouped.column(dimension)?;
    (0..column.len())
        .map(|idx| Ok(key_label(dimension, column.get(idx)?)))
        .collect()
}

fn group_counts(grouped: &DataFrame) -> Result<Vec<usize>> {
    let counts = grouped.column(COUNT_ALIAS)?.cast(&DataType::UInt64)?;
    Ok(counts
        .as_materialized_series()
        .u64()?
        .iter()
        .map(|count| count.unwrap_or_default() as usize)
        .collect())
}

fn float_column(grouped: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let values = grouped.column(name)?.cast(&DataType::Float64)?;
    Ok(values.as_materialized_series().f64()?.iter().collect())
}

/// The `limit` most frequent first-dimension keys; ties go to the smaller key.
fn leading_keys(rows: &[GroupRow], limit: usize) -> HashSet<String> {
    let mut totals: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        *totals.entry(row.keys[0].as_str()).or_default() += row.count;
    }
    let mut ranked: Vec<(&str, usize)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(key, _)| key.to_string())
        .collect()
}

fn compare_all_keys(a: &GroupRow, b: &GroupRow) -> Ordering {
    a.keys
        .iter()
        .zip(&b.keys)
        .map(|(x, y)| compare_keys(x, y))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn sort_rows(rows: &mut [GroupRow], dimensions: &[String], sort: SortOrder) {
    let by_count = |a: &GroupRow, b: &GroupRow| {
        b.count.cmp(&a.count).then_with(|| compare_all_keys(a, b))
    };
    match sort {
        SortOrder::Presentation if dimensions.iter().any(|d| has_semantic_order(d)) => {
            rows.sort_by(|a, b| {
                dimensions
                    .iter()
                    .enumerate()
                    .map(|(i, dimension)| compare_in_dimension(dimension, &a.keys[i], &b.keys[i]))
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
        }
        SortOrder::Presentation | SortOrder::CountDesc => rows.sort_by(by_count),
        SortOrder::KeyAsc => rows.sort_by(compare_all_keys),
        SortOrder::MetricDesc(index) => rows.sort_by(|a, b| {
            match (a.values[index], b.values[index]) {
                (Some(x), Some(y)) => y.total_cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(|| by_count(a, b))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn table() -> DataFrame {
        df!(
            "season" => [Some("Winter"), Some("Summer"), Some("Summer"), None, Some("Spring")],
            "hotel" => ["City Hotel", "City Hotel", "Resort Hotel", "City Hotel", "Resort Hotel"],
            "is_canceled" => [1i64, 0, 1, 1, 0],
            "total_nights" => [2i64, 20, 4, 3, 1],
        )
        .unwrap()
    }

    #[test]
    fn semantic_dimension_uses_fixed_order() {
        let breakdown = Breakdown::by("season").with_metric(Metric::CancellationRate);
        let result = aggregate(&table(), &breakdown).unwrap();
        let keys: Vec<&str> = result.rows.iter().map(|r| r.keys[0].as_str()).collect();
        assert_eq!(keys, ["Spring", "Summer", "Winter"]);
        assert_eq!(result.value(&["Summer"], "cancellation_rate"), Some(50.0));
        assert_eq!(result.total_count(), 4);
    }

    #[test]
    fn other_dimensions_sort_by_count() {
        let result = aggregate(&table(), &Breakdown::by("hotel")).unwrap();
        assert_eq!(result.rows[0].keys, ["City Hotel"]);
        assert_eq!(result.rows[0].count, 3);
    }

    #[test]
    fn constraints_drop_records() {
        let breakdown = Breakdown::by("hotel")
            .with_constraint(RowConstraint::at_most("total_nights", 14.0))
            .with_metric(Metric::mean("total_nights"));
        let result = aggregate(&table(), &breakdown).unwrap();
        assert_eq!(result.find(&["City Hotel"]).unwrap().count, 2);
        assert_eq!(result.value(&["City Hotel"], "mean_total_nights"), Some(2.5));
    }

    #[test]
    fn metric_sort_needs_the_metric() {
        let breakdown = Breakdown::by("hotel").with_sort(SortOrder::MetricDesc(0));
        assert!(matches!(
            aggregate(&table(), &breakdown),
            Err(QueryError::MetricIndex { index: 0, available: 0 })
        ));
    }

    #[test]
    fn cancellation_flags_group_as_statuses() {
        let result = aggregate(&table(), &Breakdown::by("is_canceled")).unwrap();
        let keys: Vec<&str> = result.rows.iter().map(|r| r.keys[0].as_str()).collect();
        assert_eq!(keys, ["Completed", "Canceled"]);
        assert_eq!(result.find(&["Canceled"]).unwrap().count, 3);
    }

    #[test]
    fn blank_keys_are_dropped_and_text_is_trimmed() {
        let df = df!(
            "meal" => [Some("BB "), Some("BB"), Some("  "), None, Some("HB")],
        )
        .unwrap();
        let result = aggregate(&df, &Breakdown::by("meal")).unwrap();
        assert_eq!(result.total_count(), 3);
        assert_eq!(result.rows[0].keys, ["BB"]);
        assert_eq!(result.rows[0].count, 2);
    }

    #[test]
    fn missing_metric_column_leaves_values_empty() {
        let breakdown = Breakdown::by("hotel").with_metric(Metric::mean("adr"));
        let result = aggregate(&table(), &breakdown).unwrap();
        assert!(result.rows.iter().all(|row| row.values == [None]));
    }

    #[test]
    fn missing_grouping_column_gives_empty_result() {
        let result = aggregate(&table(), &Breakdown::by("country")).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn to_frame_lays_out_keys_count_and_metrics() {
        let breakdown = Breakdown::by("hotel").with_metric(Metric::Cancellations);
        let frame = aggregate(&table(), &breakdown).unwrap().to_frame().unwrap();
        let names: Vec<&str> = frame.get_column_names().into_iter().map(|n| n.as_str()).collect();
        assert_eq!(names, ["hotel", "count", "cancellations"]);
        assert_eq!(frame.height(), 2);
    }
}
