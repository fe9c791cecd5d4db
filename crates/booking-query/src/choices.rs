//! Values offered to the control surface.

use booking_ingest::{any_to_string, clean_series, float_values};
use booking_model::{FilterChoices, YearRange, columns};
use polars::prelude::*;

use crate::error::Result;

fn distinct(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let Ok(column) = df.column(column) else {
        return Ok(Vec::new());
    };
    let unique = clean_series(column)?.drop_nulls().unique()?;
    let mut values = (0..unique.len())
        .map(|idx| unique.get(idx).map(any_to_string))
        .collect::<PolarsResult<Vec<String>>>()?;
    values.sort();
    Ok(values)
}

fn year_bounds(df: &DataFrame) -> Result<Option<YearRange>> {
    let Ok(column) = df.column(columns::ARRIVAL_YEAR) else {
        return Ok(None);
    };
    let years = float_values(column)?;
    let whole = years.filter(&(&years % 1.0).equal(0.0))?;
    let bounds = whole
        .min()
        .zip(whole.max())
        .and_then(|(min, max)| YearRange::new(min as i32, max as i32).ok());
    Ok(bounds)
}

/// Distinct sorted values per filter dimension and the observed year span.
///
/// # Errors
///
/// Fails when Polars cannot read a filter column.
pub fn filter_choices(df: &DataFrame) -> Result<FilterChoices> {
    Ok(FilterChoices {
        hotels: distinct(df, columns::HOTEL)?,
        customer_types: distinct(df, columns::CUSTOMER_TYPE)?,
        market_segments: distinct(df, columns::MARKET_SEGMENT)?,
        distribution_channels: distinct(df, columns::DISTRIBUTION_CHANNEL)?,
        deposit_types: distinct(df, columns::DEPOSIT_TYPE)?,
        year_bounds: year_bounds(df)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn choices_are_sorted_and_bounded() {
        let df = df!(
            "hotel" => ["Resort Hotel", "City Hotel", "City Hotel"],
            "arrival_date_year" => [2016i64, 2015, 2017],
        )
        .unwrap();
        let choices = filter_choices(&df).unwrap();
        assert_eq!(choices.hotels, ["City Hotel", "Resort Hotel"]);
        assert!(choices.customer_types.is_empty());
        assert_eq!(choices.year_bounds, Some(YearRange::new(2015, 2017).unwrap()));
    }

    #[test]
    fn blanks_and_fractional_years_are_ignored() {
        let df = df!(
            "hotel" => [Some(" City Hotel"), Some("  "), None],
            "arrival_date_year" => [Some(2016.0), Some(2014.5), Some(f64::NAN)],
        )
        .unwrap();
        let choices = filter_choices(&df).unwrap();
        assert_eq!(choices.hotels, ["City Hotel"]);
        assert_eq!(choices.year_bounds, Some(YearRange::new(2016, 2016).unwrap()));
    }
}
