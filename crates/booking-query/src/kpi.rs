//! Headline metrics and the cancellation impact estimate.

use booking_ingest::float_values;
use booking_model::{ImpactAssumptions, columns};
use booking_profile::stats::round2;
use polars::prelude::{ChunkAgg, ChunkCompareEq, DataFrame, Float64Chunked};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;

/// Summary figures for the filtered table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineMetrics {
    pub bookings: usize,
    /// `None` when the table has no cancellation flag.
    pub cancellations: Option<u64>,
    pub cancellation_rate: Option<f64>,
    pub mean_adr: Option<f64>,
    pub mean_lead_time: Option<f64>,
}

/// Numeric values of a column, or `None` when the table lacks it.
fn numbers(df: &DataFrame, column: &str) -> Result<Option<Float64Chunked>> {
    match df.column(column) {
        Ok(column) => Ok(Some(float_values(column)?)),
        Err(_) => Ok(None),
    }
}

fn mean_of(df: &DataFrame, column: &str) -> Result<Option<f64>> {
    Ok(numbers(df, column)?.and_then(|values| values.mean()))
}

/// Computes the headline figures. Rates and means are rounded to two decimals.
///
/// # Errors
///
/// Fails when Polars cannot read a metric column as numbers.
pub fn headline_metrics(df: &DataFrame) -> Result<HeadlineMetrics> {
    let flags = numbers(df, columns::IS_CANCELED)?;
    let metrics = HeadlineMetrics {
        bookings: df.height(),
        cancellations: flags
            .as_ref()
            .map(|flags| u64::from(flags.not_equal(0.0).sum().unwrap_or_default())),
        cancellation_rate: flags
            .as_ref()
            .and_then(|flags| flags.mean())
            .map(|rate| round2(rate * 100.0)),
        mean_adr: mean_of(df, columns::ADR)?.map(round2),
        mean_lead_time: mean_of(df, columns::LEAD_TIME)?.map(round2),
    };
    debug!(bookings = metrics.bookings, "computed headline metrics");
    Ok(metrics)
}

/// Projected effect of lowering the cancellation rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactEstimate {
    pub reduction_points: u32,
    pub bookings: usize,
    pub current_rate: f64,
    /// Current rate minus the reduction, floored at zero.
    pub target_rate: f64,
    pub bookings_saved: u64,
    pub mean_adr: f64,
    pub average_nights: f64,
    pub recovered_revenue: f64,
}

/// Estimates bookings and revenue recovered by a rate reduction.
///
/// Saved bookings are `floor(bookings * points / 100)`; recovered revenue
/// is saved bookings times mean ADR times the assumed nights per stay.
///
/// # Errors
///
/// Fails when the reduction is outside the accepted range.
pub fn impact_estimate(
    df: &DataFrame,
    reduction_points: u32,
    assumptions: &ImpactAssumptions,
) -> Result<ImpactEstimate> {
    assumptions.check_reduction(reduction_points)?;
    let bookings = df.height();
    let current_rate = mean_of(df, columns::IS_CANCELED)?.map_or(0.0, |rate| rate * 100.0);
    let mean_adr = mean_of(df, columns::ADR)?.unwrap_or(0.0);
    let bookings_saved = (bookings as u64 * u64::from(reduction_points)) / 100;
    let recovered_revenue = bookings_saved as f64 * mean_adr * assumptions.average_nights;

    Ok(ImpactEstimate {
        reduction_points,
        bookings,
        current_rate: round2(current_rate),
        target_rate: round2((current_rate - f64::from(reduction_points)).max(0.0)),
        bookings_saved,
        mean_adr: round2(mean_adr),
        average_nights: assumptions.average_nights,
        recovered_revenue: round2(recovered_revenue),
    })
}
