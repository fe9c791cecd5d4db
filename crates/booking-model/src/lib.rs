//! Domain vocabulary for hotel booking analysis.
//!
//! - **columns**: source and derived column names
//! - **calendar**: month names and seasons
//! - **lead_time**: lead-time buckets and their table-dependent cap
//! - **adr**: average-daily-rate price bands
//! - **filter**: filter criteria and control-surface choices
//! - **status**: completed and canceled labels
//! - **summary**: profiler output rows
//! - **options**: profiling, derivation and impact options

pub mod adr;
pub mod calendar;
pub mod columns;
pub mod error;
pub mod filter;
pub mod lead_time;
pub mod options;
pub mod status;
pub mod summary;

pub use adr::AdrBand;
pub use calendar::{Month, Season};
pub use error::{ModelError, Result};
pub use filter::{FilterChoices, FilterCriteria, Predicate, Selection, YearRange};
pub use lead_time::{LeadTimeBands, LeadTimeBucket, LeadTimeCap};
pub use options::{DerivationOptions, ImpactAssumptions, InvalidDatePolicy, ProfileOptions};
pub use status::BookingStatus;
pub use summary::{
    ColumnKind, ColumnSummary, DatasetProfile, DuplicateReport, NumericStats, TemporalRange,
    ValueCount, format_value_counts,
};
