//! Filtering and aggregation over enriched booking tables.
//!
//! - **filter**: narrow the table to the selected criteria
//! - **aggregate**: grouped counts and metrics over one or two dimensions
//! - **presets**: the breakdown behind each dashboard chart
//! - **kpi**: headline metrics and the cancellation impact estimate
//! - **choices**: values the control surface can offer

pub mod aggregate;
pub mod choices;
pub mod error;
pub mod filter;
pub mod kpi;
pub mod ordering;
pub mod presets;

pub use aggregate::{
    AggregationResult, Breakdown, GroupRow, Metric, RowConstraint, SortOrder, aggregate,
};
pub use choices::filter_choices;
pub use error::{QueryError, Result};
pub use filter::{apply_filters, filter_expr, predicate_expr};
pub use kpi::{HeadlineMetrics, ImpactEstimate, headline_metrics, impact_estimate};
pub use presets::Preset;
