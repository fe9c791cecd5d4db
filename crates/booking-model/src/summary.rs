//! Profiler output types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic kind of a column, deciding which statistics apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Temporal,
    Boolean,
    Text,
}

impl ColumnKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Temporal => "temporal",
            Self::Boolean => "boolean",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Descriptive statistics of a numeric column, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; undefined for a single value.
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub q3: f64,
    pub max: f64,
}

/// Earliest and latest value of a temporal column, as rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalRange {
    pub min: String,
    pub max: String,
}

/// A value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Renders value counts as `"a (3); b (2); c (1)"`.
pub fn format_value_counts(values: &[ValueCount]) -> String {
    values
        .iter()
        .map(|entry| format!("{} ({})", entry.value, entry.count))
        .collect::<Vec<_>>()
        .join("; ")
}

/// One profiled column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    /// Storage type as reported by the table engine.
    pub dtype: String,
    pub kind: ColumnKind,
    pub non_null: usize,
    pub null_pct: f64,
    pub unique: usize,
    pub numeric: Option<NumericStats>,
    pub temporal: Option<TemporalRange>,
    /// Most frequent values; `None` when the column is not categorical-like.
    pub top_values: Option<Vec<ValueCount>>,
}

impl ColumnSummary {
    /// Top values in display form. Empty when there are none to show.
    #[must_use]
    pub fn top_values_display(&self) -> String {
        self.top_values
            .as_deref()
            .map(format_value_counts)
            .unwrap_or_default()
    }
}

/// Rows that repeat another row exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Rows beyond the first of each duplicate group.
    pub duplicate_rows: usize,
    /// Every row index that belongs to a group of two or more identical rows.
    pub member_rows: Vec<usize>,
}

/// Profile of a whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: usize,
    pub summaries: Vec<ColumnSummary>,
}

impl DatasetProfile {
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.summaries.iter().find(|summary| summary.name == name)
    }
}
