//! What a derivation run did and which inputs it could not use.

use std::fmt;

use booking_model::LeadTimeBands;
use serde::Serialize;

use crate::capabilities::Feature;

/// Why an arrival date could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateIssue {
    /// Year, month or day is empty.
    MissingPart,
    UnknownMonth,
    /// Year or day is not a whole number.
    NotANumber,
    /// The parts name a day that does not exist, such as 31 April.
    NoSuchDay,
}

impl fmt::Display for DateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MissingPart => "missing year, month or day",
            Self::UnknownMonth => "unknown month name",
            Self::NotANumber => "year or day is not a whole number",
            Self::NoSuchDay => "no such calendar day",
        };
        f.write_str(text)
    }
}

/// A record whose arrival date is left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidDate {
    pub row: usize,
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
    pub issue: DateIssue,
}

impl fmt::Display for InvalidDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |p: &Option<String>| p.clone().unwrap_or_else(|| "<missing>".to_string());
        write!(
            f,
            "{} (year {}, month {}, day {})",
            self.issue,
            part(&self.year),
            part(&self.month),
            part(&self.day)
        )
    }
}

/// A numeric source cell holding something that is not a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedValue {
    pub row: usize,
    pub column: &'static str,
    pub raw: String,
}

/// A feature that was not derived and the columns it lacked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFeature {
    pub feature: Feature,
    pub missing: Vec<&'static str>,
}

/// Outcome of one derivation run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DerivationReport {
    pub applied: Vec<Feature>,
    pub skipped: Vec<SkippedFeature>,
    pub invalid_dates: Vec<InvalidDate>,
    pub malformed_values: Vec<MalformedValue>,
    /// Records whose month name is not one of the twelve English names.
    pub unknown_months: usize,
    /// Bands used for the lead-time bucket, when that feature ran.
    pub lead_time_bands: Option<LeadTimeBands>,
}

impl DerivationReport {
    #[must_use]
    pub fn is_applied(&self, feature: Feature) -> bool {
        self.applied.contains(&feature)
    }

    /// True when every record's inputs were usable.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.invalid_dates.is_empty() && self.malformed_values.is_empty() && self.unknown_months == 0
    }
}
