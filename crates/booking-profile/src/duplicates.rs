//! Exact duplicate rows.

use booking_model::DuplicateReport;
use polars::prelude::{DataFrame, IntoLazy, col, len};
use tracing::debug;

use crate::error::Result;

/// Finds rows that repeat another row in every column.
///
/// Nulls compare equal to each other and unequal to any value.
///
/// # Errors
///
/// Fails when Polars cannot group the rows.
pub fn detect_duplicates(df: &DataFrame) -> Result<DuplicateReport> {
    if df.width() == 0 || df.height() == 0 {
        return Ok(DuplicateReport::default());
    }
    let keys: Vec<_> = df
        .get_column_names()
        .into_iter()
        .map(|name| col(name.clone()))
        .collect();
    let distinct = df
        .clone()
        .lazy()
        .group_by(keys)
        .agg([len()])
        .collect()?
        .height();

    let members = df.is_duplicated()?;
    let report = DuplicateReport {
        duplicate_rows: df.height() - distinct,
        member_rows: members
            .iter()
            .enumerate()
            .filter_map(|(row, member)| member.unwrap_or(false).then_some(row))
            .collect(),
    };
    debug!(
        duplicates = report.duplicate_rows,
        members = report.member_rows.len(),
        "checked duplicate rows"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn counts_repeats_beyond_the_first() {
        let df = df!(
            "hotel" => ["City Hotel", "Resort Hotel", "City Hotel", "City Hotel", "Resort Hotel"],
            "adr" => [75.0, 100.0, 75.0, 75.0, 90.0],
        )
        .unwrap();
        let report = detect_duplicates(&df).unwrap();
        assert_eq!(report.duplicate_rows, 2);
        assert_eq!(report.member_rows, vec![0, 2, 3]);
    }

    #[test]
    fn nulls_match_nulls_only() {
        let df = df!("country" => [None, Some("PRT"), None, Some("")]).unwrap();
        let report = detect_duplicates(&df).unwrap();
        assert_eq!(report.duplicate_rows, 1);
        assert_eq!(report.member_rows, vec![0, 2]);
    }

    #[test]
    fn empty_table_has_no_duplicates() {
        let df = DataFrame::empty();
        assert_eq!(detect_duplicates(&df).unwrap(), DuplicateReport::default());
    }
}
