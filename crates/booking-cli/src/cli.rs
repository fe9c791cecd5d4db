//! CLI argument definitions for the booking explorer.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "booking",
    version,
    about = "Hotel booking explorer - profile, enrich and break down booking data",
    long_about = "Profile, enrich and break down a hotel booking CSV.\n\n\
                  Derives arrival dates, stay length, party size, season, lead-time\n\
                  and price bands, then reports cancellation figures per dimension."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// JSON configuration file with ingest, profile, derivation and impact
    /// settings.
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Summarize every column of the booking table.
    Profile(ProfileArgs),

    /// Show which derived features the table supports and any bad inputs.
    Features(SourceArgs),

    /// Headline figures for the filtered bookings.
    Summary(SummaryArgs),

    /// Grouped counts and rates behind one dashboard chart.
    Breakdown(BreakdownArgs),

    /// Estimate bookings and revenue recovered by fewer cancellations.
    Impact(ImpactArgs),

    /// List the values each filter accepts.
    Choices(SourceArgs),

    /// List the available breakdown presets.
    Presets,
}

#[derive(Args)]
pub struct SourceArgs {
    /// Booking CSV file.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,
}

#[derive(Args)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Profile the table after feature derivation.
    #[arg(long = "enriched")]
    pub enriched: bool,

    /// Columns with fewer distinct values get a top-values list.
    #[arg(long = "threshold", value_name = "N")]
    pub threshold: Option<usize>,

    /// How many frequent values to list.
    #[arg(long = "top", value_name = "N")]
    pub top: Option<usize>,

    /// Also list the distinct values of every text column.
    #[arg(long = "categories")]
    pub categories: bool,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Output format (csv is not available).
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct BreakdownArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Preset name, see `booking presets`.
    #[arg(value_name = "PRESET")]
    pub preset: String,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct ImpactArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Cancellation rate reduction in percentage points.
    #[arg(long = "reduction", value_name = "PP", default_value_t = 10)]
    pub reduction: u32,

    /// Assumed nights per recovered booking (overrides the config file).
    #[arg(long = "nights", value_name = "N")]
    pub nights: Option<f64>,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Output format (csv is not available).
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

/// Filter flags shared by the reporting commands. Omitted flags keep
/// every value.
#[derive(Args, Default)]
pub struct FilterArgs {
    /// Keep one hotel category.
    #[arg(long = "hotel", value_name = "HOTEL")]
    pub hotel: Option<String>,

    #[arg(long = "customer-type", value_name = "TYPE")]
    pub customer_type: Option<String>,

    #[arg(long = "market-segment", value_name = "SEGMENT")]
    pub market_segment: Option<String>,

    #[arg(long = "channel", value_name = "CHANNEL")]
    pub channel: Option<String>,

    #[arg(long = "deposit-type", value_name = "TYPE")]
    pub deposit_type: Option<String>,

    /// First arrival year (defaults to the earliest observed).
    #[arg(long = "from-year", value_name = "YEAR")]
    pub from_year: Option<i32>,

    /// Last arrival year (defaults to the latest observed).
    #[arg(long = "to-year", value_name = "YEAR")]
    pub to_year: Option<i32>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
    Csv,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
