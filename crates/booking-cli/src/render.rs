//! Terminal tables, CSV and JSON output.

use anyhow::{Context, Result};
use booking_derive::{DerivationReport, Feature};
use booking_model::{DatasetProfile, DuplicateReport, FilterChoices};
use booking_profile::CategoryValues;
use booking_query::{AggregationResult, HeadlineMetrics, ImpactEstimate};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;

/// How a command writes its result to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

const PROFILE_HEADER: [&str; 16] = [
    "column",
    "dtype",
    "kind",
    "non_null",
    "null_pct",
    "unique",
    "mean",
    "median",
    "std",
    "min",
    "q1",
    "q3",
    "max",
    "first",
    "last",
    "top_values",
];

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn profile_records(profile: &DatasetProfile) -> Vec<Vec<String>> {
    profile
        .summaries
        .iter()
        .map(|summary| {
            let numeric = summary.numeric.as_ref();
            let temporal = summary.temporal.as_ref();
            vec![
                summary.name.clone(),
                summary.dtype.clone(),
                summary.kind.to_string(),
                summary.non_null.to_string(),
                summary.null_pct.to_string(),
                summary.unique.to_string(),
                optional(numeric.map(|n| n.mean)),
                optional(numeric.map(|n| n.median)),
                optional(numeric.and_then(|n| n.std)),
                optional(numeric.map(|n| n.min)),
                optional(numeric.map(|n| n.q1)),
                optional(numeric.map(|n| n.q3)),
                optional(numeric.map(|n| n.max)),
                temporal.map(|t| t.min.clone()).unwrap_or_default(),
                temporal.map(|t| t.max.clone()).unwrap_or_default(),
                summary.top_values_display(),
            ]
        })
        .collect()
}

fn aggregation_header(result: &AggregationResult) -> Vec<String> {
    result
        .dimensions
        .iter()
        .cloned()
        .chain(std::iter::once("count".to_string()))
        .chain(result.metrics.iter().cloned())
        .collect()
}

fn aggregation_records(result: &AggregationResult) -> Vec<Vec<String>> {
    result
        .rows
        .iter()
        .map(|row| {
            row.keys
                .iter()
                .cloned()
                .chain(std::iter::once(row.count.to_string()))
                .chain(row.values.iter().map(|value| optional(*value)))
                .collect()
        })
        .collect()
}

fn write_csv(header: &[String], records: &[Vec<String>]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header).context("write csv header")?;
    for record in records {
        writer.write_record(record).context("write csv row")?;
    }
    let bytes = writer.into_inner().context("flush csv")?;
    String::from_utf8(bytes).context("csv output is not utf-8")
}

/// Profile rows as CSV, one line per column.
///
/// # Errors
///
/// Fails only if the CSV writer fails.
pub fn profile_csv(profile: &DatasetProfile) -> Result<String> {
    let header: Vec<String> = PROFILE_HEADER.iter().map(ToString::to_string).collect();
    write_csv(&header, &profile_records(profile))
}

/// Aggregation rows as CSV: key columns, `count`, then metrics.
///
/// # Errors
///
/// Fails only if the CSV writer fails.
pub fn aggregation_csv(result: &AggregationResult) -> Result<String> {
    write_csv(&aggregation_header(result), &aggregation_records(result))
}

/// # Errors
///
/// Fails when the value cannot be serialized.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("serialize output")
}

pub fn profile_table(profile: &DatasetProfile) -> Table {
    let mut table = Table::new();
    table.set_header(PROFILE_HEADER.iter().map(|label| header_cell(label)));
    apply_wide_table_style(&mut table);
    for index in [3, 4, 5, 6, 7, 8, 9, 10, 11, 12] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (summary, record) in profile.summaries.iter().zip(profile_records(profile)) {
        table.add_row(record.into_iter().enumerate().map(|(index, text)| {
            if index == 4 && summary.null_pct > 0.0 {
                Cell::new(text).fg(Color::Yellow)
            } else if text.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(text)
            }
        }));
    }
    table
}

pub fn aggregation_table(result: &AggregationResult) -> Table {
    let mut table = Table::new();
    table.set_header(aggregation_header(result).iter().map(|label| header_cell(label)));
    apply_table_style(&mut table);
    for index in result.dimensions.len()..table.column_count() {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for record in aggregation_records(result) {
        table.add_row(record.into_iter().map(|text| {
            if text.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(text)
            }
        }));
    }
    let mut total = vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ];
    total.extend((1..result.dimensions.len()).map(|_| dim_cell("")));
    total.push(Cell::new(result.total_count()).add_attribute(Attribute::Bold));
    table.add_row(total);
    table
}

pub fn headline_table(metrics: &HeadlineMetrics) -> Table {
    key_value_table(vec![
        ("Bookings", metrics.bookings.to_string()),
        (
            "Cancellations",
            metrics.cancellations.map(|c| c.to_string()).unwrap_or_default(),
        ),
        ("Cancellation rate (%)", optional(metrics.cancellation_rate)),
        ("Mean ADR (€)", optional(metrics.mean_adr)),
        ("Mean lead time (days)", optional(metrics.mean_lead_time)),
    ])
}

pub fn impact_table(estimate: &ImpactEstimate) -> Table {
    key_value_table(vec![
        ("Reduction (points)", estimate.reduction_points.to_string()),
        ("Bookings", estimate.bookings.to_string()),
        ("Current rate (%)", estimate.current_rate.to_string()),
        ("Target rate (%)", estimate.target_rate.to_string()),
        ("Bookings saved", estimate.bookings_saved.to_string()),
        ("Mean ADR (€)", estimate.mean_adr.to_string()),
        ("Nights per stay", estimate.average_nights.to_string()),
        ("Recovered revenue (€)", estimate.recovered_revenue.to_string()),
    ])
}

pub fn choices_table(choices: &FilterChoices) -> Table {
    let years = choices
        .year_bounds
        .map(|range| format!("{}-{}", range.start(), range.end()))
        .unwrap_or_default();
    key_value_table(vec![
        ("Hotels", choices.hotels.join(", ")),
        ("Customer types", choices.customer_types.join(", ")),
        ("Market segments", choices.market_segments.join(", ")),
        ("Distribution channels", choices.distribution_channels.join(", ")),
        ("Deposit types", choices.deposit_types.join(", ")),
        ("Arrival years", years),
    ])
}

pub fn categories_table(categories: &[CategoryValues]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("column"),
        header_cell("distinct"),
        header_cell("values"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for category in categories {
        table.add_row(vec![
            Cell::new(&category.column),
            Cell::new(category.values.len()),
            Cell::new(category.values.join(", ")),
        ]);
    }
    table
}

/// One line per derived feature: applied, or the source columns it lacked.
pub fn derivation_table(report: &DerivationReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("feature"),
        header_cell("status"),
        header_cell("detail"),
    ]);
    apply_table_style(&mut table);
    for feature in &report.applied {
        let detail = match report.lead_time_bands {
            Some(bands) if *feature == Feature::LeadTimeBucket => bands
                .cap()
                .map_or_else(|| "open-ended".to_string(), |cap| format!("capped at {cap} days")),
            _ => String::new(),
        };
        table.add_row(vec![
            Cell::new(feature.column()),
            Cell::new("applied").fg(Color::Green),
            Cell::new(detail),
        ]);
    }
    for skipped in &report.skipped {
        table.add_row(vec![
            Cell::new(skipped.feature.column()),
            Cell::new("skipped").fg(Color::Yellow),
            Cell::new(format!("missing {}", skipped.missing.join(", "))),
        ]);
    }
    table
}

/// Data problems found while deriving, one line per kind.
pub fn derivation_notes(report: &DerivationReport) -> Vec<String> {
    let mut notes = Vec::new();
    if !report.invalid_dates.is_empty() {
        notes.push(format!(
            "{} invalid arrival date(s), first at row {}: {}",
            report.invalid_dates.len(),
            report.invalid_dates[0].row,
            report.invalid_dates[0]
        ));
    }
    if !report.malformed_values.is_empty() {
        let first = &report.malformed_values[0];
        notes.push(format!(
            "{} malformed numeric value(s), first at row {} in {}: {:?}",
            report.malformed_values.len(),
            first.row,
            first.column,
            first.raw
        ));
    }
    if report.unknown_months > 0 {
        notes.push(format!("{} unknown month name(s)", report.unknown_months));
    }
    notes
}

pub fn duplicates_line(report: &DuplicateReport) -> String {
    format!(
        "Duplicate rows: {} ({} rows in duplicate groups)",
        report.duplicate_rows,
        report.member_rows.len()
    )
}

fn key_value_table(rows: Vec<(&str, String)>) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    for (label, value) in rows {
        let value = if value.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(value)
        };
        table.add_row(vec![header_cell(label), value]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_wide_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(200);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
