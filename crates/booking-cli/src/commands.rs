use anyhow::{Result, bail};
use booking_cli::render::{
    aggregation_csv, aggregation_table, categories_table, choices_table, derivation_notes,
    derivation_table, duplicates_line, headline_table, impact_table, profile_csv, profile_table,
    to_json,
};
use booking_cli::{DashboardConfig, OutputFormat, Session};
use booking_model::{FilterChoices, FilterCriteria, Selection, YearRange};
use booking_query::Preset;
use comfy_table::{Cell, Table};
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::cli::{
    BreakdownArgs, FilterArgs, ImpactArgs, OutputFormatArg, ProfileArgs, SourceArgs, SummaryArgs,
};

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Table => Self::Table,
            OutputFormatArg::Json => Self::Json,
            OutputFormatArg::Csv => Self::Csv,
        }
    }
}

/// Builds filter criteria from the flags. A single year bound is completed
/// with the observed bound on the other side.
pub fn criteria_from_args(args: &FilterArgs, choices: &FilterChoices) -> Result<FilterCriteria> {
    let years = match (args.from_year, args.to_year) {
        (None, None) => None,
        (from, to) => {
            let bounds = choices.year_bounds;
            let start = from.or(bounds.map(|b| b.start())).or(to);
            let end = to.or(bounds.map(|b| b.end())).or(from);
            match (start, end) {
                (Some(start), Some(end)) => Some(YearRange::new(start, end)?),
                _ => None,
            }
        }
    };
    Ok(FilterCriteria {
        hotel: Selection::from(args.hotel.clone()),
        customer_type: Selection::from(args.customer_type.clone()),
        market_segment: Selection::from(args.market_segment.clone()),
        distribution_channel: Selection::from(args.channel.clone()),
        deposit_type: Selection::from(args.deposit_type.clone()),
        years,
    })
}

fn open(args: &SourceArgs, config: DashboardConfig) -> Result<Session> {
    let session = Session::open(&args.csv, config)?;
    info!(
        rows = session.source().frame().height(),
        fingerprint = session.source().fingerprint().short(),
        "opened booking table"
    );
    Ok(session)
}

fn no_csv(command: &str, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Csv {
        bail!("{command} has no csv output; use table or json");
    }
    Ok(())
}

pub fn run_profile(args: &ProfileArgs, mut config: DashboardConfig) -> Result<()> {
    if let Some(threshold) = args.threshold {
        config.profile.categorical_threshold = threshold;
    }
    if let Some(top) = args.top {
        config.profile.top_values = top;
    }
    let format = OutputFormat::from(args.format);
    let mut session = open(&args.source, config)?;
    let profile = session.profile(args.enriched)?;
    let duplicates = session.duplicates()?;
    let categories = args.categories.then(|| session.categories()).transpose()?;

    match format {
        OutputFormat::Table => {
            println!("Rows: {}  Columns: {}", profile.rows, profile.columns);
            println!("{}", profile_table(&profile));
            println!("{}", duplicates_line(&duplicates));
            if let Some(categories) = &categories {
                println!();
                println!("{}", categories_table(categories));
            }
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ProfileOutput<'a> {
                #[serde(flatten)]
                profile: &'a booking_model::DatasetProfile,
                duplicates: &'a booking_model::DuplicateReport,
                #[serde(skip_serializing_if = "Option::is_none")]
                categories: Option<&'a [booking_profile::CategoryValues]>,
            }
            let output = ProfileOutput {
                profile: &profile,
                duplicates: &duplicates,
                categories: categories.as_deref(),
            };
            println!("{}", to_json(&output)?);
        }
        OutputFormat::Csv => print!("{}", profile_csv(&profile)?),
    }
    Ok(())
}

pub fn run_features(args: &SourceArgs, config: DashboardConfig) -> Result<bool> {
    let mut session = open(args, config)?;
    let enriched = session.enriched()?;
    let report = &enriched.report;
    println!("{}", derivation_table(report));
    let notes = derivation_notes(report);
    for note in &notes {
        println!("- {note}");
    }
    Ok(report.is_clean())
}

pub fn run_summary(args: &SummaryArgs, config: DashboardConfig) -> Result<()> {
    let format = OutputFormat::from(args.format);
    no_csv("summary", format)?;
    let mut session = open(&args.source, config)?;
    let criteria = criteria_from_args(&args.filters, session.choices())?;
    let metrics = session.headline(&criteria)?;
    match format {
        OutputFormat::Json => println!("{}", to_json(&metrics)?),
        OutputFormat::Table | OutputFormat::Csv => println!("{}", headline_table(&metrics)),
    }
    Ok(())
}

pub fn run_breakdown(args: &BreakdownArgs, config: DashboardConfig) -> Result<()> {
    let preset: Preset = args.preset.parse()?;
    let span = info_span!("command", preset = preset.name());
    let _guard = span.enter();
    let mut session = open(&args.source, config)?;
    let criteria = criteria_from_args(&args.filters, session.choices())?;
    let result = session.breakdown(preset, &criteria)?;
    debug!(groups = result.rows.len(), "breakdown ready");
    match OutputFormat::from(args.format) {
        OutputFormat::Table => {
            println!("{}", preset.title());
            if result.is_empty() {
                println!("No bookings in this breakdown.");
            } else {
                println!("{}", aggregation_table(&result));
            }
        }
        OutputFormat::Json => println!("{}", to_json(&result)?),
        OutputFormat::Csv => print!("{}", aggregation_csv(&result)?),
    }
    Ok(())
}

pub fn run_impact(args: &ImpactArgs, mut config: DashboardConfig) -> Result<()> {
    if let Some(nights) = args.nights {
        config.impact.average_nights = nights;
    }
    let format = OutputFormat::from(args.format);
    no_csv("impact", format)?;
    let mut session = open(&args.source, config)?;
    let criteria = criteria_from_args(&args.filters, session.choices())?;
    let estimate = session.impact(args.reduction, &criteria)?;
    match format {
        OutputFormat::Json => println!("{}", to_json(&estimate)?),
        OutputFormat::Table | OutputFormat::Csv => println!("{}", impact_table(&estimate)),
    }
    Ok(())
}

pub fn run_choices(args: &SourceArgs, config: DashboardConfig) -> Result<()> {
    let session = open(args, config)?;
    println!("{}", choices_table(session.choices()));
    Ok(())
}

pub fn run_presets() {
    let mut table = Table::new();
    table.set_header(vec!["Preset", "Chart"]);
    for preset in Preset::ALL {
        table.add_row(vec![Cell::new(preset.name()), Cell::new(preset.title())]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> FilterChoices {
        FilterChoices {
            year_bounds: Some(YearRange::new(2015, 2017).unwrap()),
            ..FilterChoices::default()
        }
    }

    #[test]
    fn no_flags_keep_everything() {
        let criteria = criteria_from_args(&FilterArgs::default(), &choices()).unwrap();
        assert!(criteria.is_unconstrained());
    }

    #[test]
    fn single_year_bound_is_completed() {
        let args = FilterArgs {
            from_year: Some(2016),
            ..FilterArgs::default()
        };
        let criteria = criteria_from_args(&args, &choices()).unwrap();
        assert_eq!(criteria.years, Some(YearRange::new(2016, 2017).unwrap()));
    }

    #[test]
    fn inverted_years_are_an_error() {
        let args = FilterArgs {
            from_year: Some(2017),
            to_year: Some(2015),
            ..FilterArgs::default()
        };
        assert!(criteria_from_args(&args, &choices()).is_err());
    }

    #[test]
    fn category_flags_become_selections() {
        let args = FilterArgs {
            hotel: Some("City Hotel".to_string()),
            channel: Some("TA/TO".to_string()),
            ..FilterArgs::default()
        };
        let criteria = criteria_from_args(&args, &choices()).unwrap();
        assert_eq!(criteria.hotel, Selection::Only("City Hotel".to_string()));
        assert_eq!(
            criteria.distribution_channel,
            Selection::Only("TA/TO".to_string())
        );
        assert_eq!(criteria.customer_type, Selection::Any);
    }
}
