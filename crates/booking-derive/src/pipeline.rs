//! Feature derivation over a raw booking table.
//!
//! Every feature is gated on [`SchemaCapabilities`]; a missing source column
//! skips that feature and nothing else. Stay and party totals are Polars
//! expressions over the cleaned count columns. Derived columns are computed from
//! the raw columns only, so running the pipeline on its own output
//! rewrites the same values.

use booking_ingest::{NumericCell, clean_frame, frame_numeric, frame_text};
use booking_model::{
    AdrBand, DerivationOptions, InvalidDatePolicy, LeadTimeBands, Month, columns,
};
use chrono::{Datelike, NaiveDate};
use polars::prelude::{
    Column, DataFrame, DataType, Expr, IntoLazy, NULL, NamedFrom, Series, col, lit, when,
};
use tracing::{debug, info, warn};

use crate::capabilities::{Feature, SchemaCapabilities};
use crate::error::{DeriveError, Result};
use crate::report::{DateIssue, DerivationReport, InvalidDate, MalformedValue, SkippedFeature};

/// Day number of 1970-01-01 counted from 0001-01-01 as day 1.
const UNIX_EPOCH_FROM_CE: i32 = 719_163;

/// A booking table with its derived columns.
#[derive(Debug, Clone)]
pub struct EnrichedTable {
    pub frame: DataFrame,
    pub capabilities: SchemaCapabilities,
    pub report: DerivationReport,
}

/// Derives every feature the table's columns allow.
///
/// The input is not modified; the enriched table is a copy with the derived
/// columns added or replaced.
///
/// # Errors
///
/// Fails under [`InvalidDatePolicy::Reject`] when any arrival date cannot be
/// built, or when Polars rejects a derived column.
pub fn derive_features(df: &DataFrame, options: &DerivationOptions) -> Result<EnrichedTable> {
    let capabilities = SchemaCapabilities::from_frame(df);
    let mut report = DerivationReport::default();
    let mut frame = df.clone();
    let rows = df.height();

    for feature in Feature::ALL {
        if !capabilities.supports(feature) {
            let missing: Vec<&'static str> = feature
                .sources()
                .iter()
                .copied()
                .filter(|name| df.column(name).is_err())
                .collect();
            debug!(feature = %feature, missing = ?missing, "skipping feature");
            report.skipped.push(SkippedFeature { feature, missing });
        }
    }

    let months = month_cells(df, &mut report);

    if capabilities.arrival_date {
        let dates = arrival_dates(df, months.as_deref(), &mut report);
        if options.invalid_dates == InvalidDatePolicy::Reject
            && let Some(first) = report.invalid_dates.first()
        {
            return Err(DeriveError::InvalidDate {
                row: first.row,
                detail: first.to_string(),
            });
        }
        let days: Vec<Option<i32>> = dates
            .iter()
            .map(|date| date.map(|d| d.num_days_from_ce() - UNIX_EPOCH_FROM_CE))
            .collect();
        let series = Series::new(columns::ARRIVAL_DATE.into(), days).cast(&DataType::Date)?;
        frame.with_column(series)?;
        report.applied.push(Feature::ArrivalDate);

        if capabilities.arrival_year_month {
            let periods: Vec<Option<String>> = dates
                .iter()
                .map(|date| date.map(|d| format!("{:04}-{:02}", d.year(), d.month())))
                .collect();
            frame.with_column(Series::new(columns::ARRIVAL_YEAR_MONTH.into(), periods))?;
            report.applied.push(Feature::ArrivalYearMonth);
        }
    }

    if capabilities.total_nights {
        let addends = [columns::WEEKEND_NIGHTS, columns::WEEK_NIGHTS];
        frame.with_column(row_sum(df, &addends, columns::TOTAL_NIGHTS, &mut report)?)?;
        report.applied.push(Feature::TotalNights);
    }

    if capabilities.total_guests {
        let addends = [columns::ADULTS, columns::CHILDREN, columns::BABIES];
        frame.with_column(row_sum(df, &addends, columns::TOTAL_GUESTS, &mut report)?)?;
        report.applied.push(Feature::TotalGuests);
    }

    if let (true, Some(months)) = (capabilities.season, months.as_deref()) {
        let seasons: Vec<Option<&str>> = months
            .iter()
            .map(|month| month.map(|m| m.season().label()))
            .collect();
        frame.with_column(Series::new(columns::SEASON.into(), seasons))?;
        report.applied.push(Feature::Season);
    }

    if capabilities.lead_time_bucket {
        let leads = whole_numbers(df, columns::LEAD_TIME, &mut report);
        let bands = LeadTimeBands::resolve(options.lead_time_cap, leads.iter().flatten().max().copied());
        let buckets: Vec<Option<&str>> = leads
            .iter()
            .map(|lead| lead.and_then(|v| bands.classify(v)).map(|b| b.label()))
            .collect();
        frame.with_column(Series::new(columns::LEAD_TIME_BUCKET.into(), buckets))?;
        report.lead_time_bands = Some(bands);
        report.applied.push(Feature::LeadTimeBucket);
    }

    if capabilities.adr_band {
        let rates = numbers(df, columns::ADR, &mut report);
        let bands: Vec<Option<&str>> = rates
            .iter()
            .map(|rate| rate.and_then(AdrBand::classify).map(AdrBand::label))
            .collect();
        frame.with_column(Series::new(columns::ADR_BAND.into(), bands))?;
        report.applied.push(Feature::AdrBand);
    }

    if !report.invalid_dates.is_empty() {
        warn!(
            count = report.invalid_dates.len(),
            first_row = report.invalid_dates[0].row,
            "arrival dates could not be built"
        );
    }
    if !report.malformed_values.is_empty() {
        warn!(
            count = report.malformed_values.len(),
            "numeric source values are not numbers"
        );
    }
    if report.unknown_months > 0 {
        warn!(count = report.unknown_months, "unrecognized month names");
    }
    info!(
        rows,
        applied = report.applied.len(),
        skipped = report.skipped.len(),
        "derived booking features"
    );

    Ok(EnrichedTable {
        frame,
        capabilities,
        report,
    })
}

/// Parsed month names, counting names that are not months.
fn month_cells(df: &DataFrame, report: &mut DerivationReport) -> Option<Vec<Option<Month>>> {
    let text = frame_text(df, columns::ARRIVAL_MONTH)?;
    let months = text
        .iter()
        .map(|cell| {
            let name = cell.as_deref()?;
            let month = Month::from_name(name);
            if month.is_none() {
                report.unknown_months += 1;
            }
            month
        })
        .collect();
    Some(months)
}

fn arrival_dates(
    df: &DataFrame,
    months: Option<&[Option<Month>]>,
    report: &mut DerivationReport,
) -> Vec<Option<NaiveDate>> {
    let (Some(years), Some(days), Some(month_text), Some(months)) = (
        frame_numeric(df, columns::ARRIVAL_YEAR),
        frame_numeric(df, columns::ARRIVAL_DAY),
        frame_text(df, columns::ARRIVAL_MONTH),
        months,
    ) else {
        return vec![None; df.height()];
    };

    let mut dates = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let year = years[row].as_count();
        let day = days[row].as_count();
        let outcome = match (&year, months[row], &day) {
            (NumericCell::Missing, _, _) | (_, _, NumericCell::Missing) => {
                Err(DateIssue::MissingPart)
            }
            _ if month_text[row].is_none() => Err(DateIssue::MissingPart),
            (NumericCell::Malformed(_), _, _) | (_, _, NumericCell::Malformed(_)) => {
                Err(DateIssue::NotANumber)
            }
            (_, None, _) => Err(DateIssue::UnknownMonth),
            (NumericCell::Value(y), Some(month), NumericCell::Value(d)) => {
                calendar_day(*y, month, *d).ok_or(DateIssue::NoSuchDay)
            }
        };
        match outcome {
            Ok(date) => dates.push(Some(date)),
            Err(issue) => {
                report.invalid_dates.push(InvalidDate {
                    row,
                    year: cell_text(&years[row]),
                    month: month_text[row].clone(),
                    day: cell_text(&days[row]),
                    issue,
                });
                dates.push(None);
            }
        }
    }
    dates
}

fn calendar_day(year: f64, month: Month, day: f64) -> Option<NaiveDate> {
    let year = i32::try_from(year as i64).ok()?;
    let day = u32::try_from(day as i64).ok()?;
    NaiveDate::from_ymd_opt(year, month.number(), day)
}

fn cell_text(cell: &NumericCell) -> Option<String> {
    match cell {
        NumericCell::Missing => None,
        NumericCell::Value(v) => Some(booking_ingest::format_numeric(*v)),
        NumericCell::Malformed(raw) => Some(raw.clone()),
    }
}

/// Reads a numeric column, reporting cells that are not numbers.
fn numbers(df: &DataFrame, column: &'static str, report: &mut DerivationReport) -> Vec<Option<f64>> {
    let Some(cells) = frame_numeric(df, column) else {
        return vec![None; df.height()];
    };
    collect_values(cells, column, report)
}

/// Reads a count column; fractional values are reported as malformed.
fn whole_numbers(
    df: &DataFrame,
    column: &'static str,
    report: &mut DerivationReport,
) -> Vec<Option<i64>> {
    let Some(cells) = frame_numeric(df, column) else {
        return vec![None; df.height()];
    };
    let counts = cells.iter().map(NumericCell::as_count).collect();
    collect_values(counts, column, report)
        .into_iter()
        .map(|value| value.map(|v| v as i64))
        .collect()
}

fn collect_values(
    cells: Vec<NumericCell>,
    column: &'static str,
    report: &mut DerivationReport,
) -> Vec<Option<f64>> {
    cells
        .into_iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            NumericCell::Value(v) => Some(v),
            NumericCell::Missing => None,
            NumericCell::Malformed(raw) => {
                report.malformed_values.push(MalformedValue { row, column, raw });
                None
            }
        })
        .collect()
}

/// A count column as `Int64`; values that are not whole numbers are null.
fn count_expr(column: &str) -> Expr {
    let value = col(column).cast(DataType::Float64);
    when((value.clone() % lit(1.0)).eq(lit(0.0)))
        .then(value)
        .otherwise(lit(NULL))
        .cast(DataType::Int64)
}

/// Records cells of a count column that are not whole numbers.
fn report_non_counts(df: &DataFrame, column: &'static str, report: &mut DerivationReport) {
    let Some(cells) = frame_numeric(df, column) else {
        return;
    };
    for (row, cell) in cells.iter().enumerate() {
        if let NumericCell::Malformed(raw) = cell.as_count() {
            report.malformed_values.push(MalformedValue { row, column, raw });
        }
    }
}

/// Row-wise sum of count columns; a missing addend leaves the sum missing.
fn row_sum(
    df: &DataFrame,
    addends: &[&'static str],
    name: &str,
    report: &mut DerivationReport,
) -> Result<Column> {
    for column in addends {
        report_non_counts(df, column, report);
    }
    let Some(sum) = addends
        .iter()
        .copied()
        .map(count_expr)
        .reduce(|total, part| total + part)
    else {
        return Ok(Column::full_null(name.into(), df.height(), &DataType::Int64));
    };
    let totals = clean_frame(df, addends)?
        .lazy()
        .select([sum.alias(name)])
        .collect()?;
    Ok(totals.column(name)?.clone())
}
