//! Narrowing the enriched table to the selected criteria.

use booking_ingest::clean_frame;
use booking_model::{FilterCriteria, Predicate};
use polars::prelude::{DataFrame, DataType, Expr, IntoLazy, col, lit};
use tracing::{debug, warn};

use crate::error::Result;

/// Polars expression for one predicate.
///
/// Equality is exact on the trimmed text, so a category named "All" is an
/// ordinary value. Years are compared as whole numbers.
pub fn predicate_expr(predicate: &Predicate) -> Expr {
    match predicate {
        Predicate::Equals { column, value } => col(*column)
            .cast(DataType::String)
            .eq(lit(value.as_str())),
        Predicate::YearWithin { column, range } => {
            let year = col(*column).cast(DataType::Float64);
            (year.clone() % lit(1.0))
                .eq(lit(0.0))
                .and(year.clone().gt_eq(lit(f64::from(range.start()))))
                .and(year.lt_eq(lit(f64::from(range.end()))))
        }
    }
}

/// Conjunction of the active predicates whose columns exist in `df`.
///
/// Unconstrained dimensions contribute nothing. A predicate on a column the
/// table does not have is skipped with a warning.
pub fn filter_expr(df: &DataFrame, criteria: &FilterCriteria) -> Option<Expr> {
    criteria
        .predicates()
        .iter()
        .filter(|predicate| {
            let present = df.column(predicate.column()).is_ok();
            if !present {
                warn!(column = predicate.column(), "filter column missing; predicate skipped");
            }
            present
        })
        .map(predicate_expr)
        .reduce(|all, next| all.and(next))
}

/// Rows of `df` matching the criteria, in their original order.
///
/// # Errors
///
/// Fails when Polars cannot evaluate a predicate.
pub fn apply_filters(df: &DataFrame, criteria: &FilterCriteria) -> Result<DataFrame> {
    let Some(keep) = filter_expr(df, criteria) else {
        return Ok(df.clone());
    };
    let predicates = criteria.predicates();
    let columns: Vec<&str> = predicates.iter().map(Predicate::column).collect();
    let mask = clean_frame(df, &columns)?
        .lazy()
        .select([keep.fill_null(lit(false)).alias("keep")])
        .collect()?;
    let filtered = df.filter(mask.column("keep")?.as_materialized_series().bool()?)?;
    debug!(
        rows = df.height(),
        kept = filtered.height(),
        predicates = predicates.len(),
        "applied filters"
    );
    Ok(filtered)
}
