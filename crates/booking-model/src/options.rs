//! Configuration options for profiling, derivation and impact estimates.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::lead_time::LeadTimeCap;

/// Options for the column profiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOptions {
    /// Columns with fewer distinct values than this get a top-values list.
    pub categorical_threshold: usize,
    /// How many frequent values to report.
    pub top_values: usize,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            categorical_threshold: 50,
            top_values: 3,
        }
    }
}

impl ProfileOptions {
    #[must_use]
    pub fn with_categorical_threshold(mut self, threshold: usize) -> Self {
        self.categorical_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_top_values(mut self, count: usize) -> Self {
        self.top_values = count;
        self
    }

    /// # Errors
    ///
    /// Rejects a zero categorical threshold or top-values count.
    pub fn validate(&self) -> Result<()> {
        if self.categorical_threshold == 0 {
            return Err(ModelError::option(
                "categorical_threshold",
                "must be at least 1",
            ));
        }
        if self.top_values == 0 {
            return Err(ModelError::option("top_values", "must be at least 1"));
        }
        Ok(())
    }
}

/// What to do with a record whose arrival date cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidDatePolicy {
    /// Keep the record with an empty date and list it in the report.
    #[default]
    Flag,
    /// Fail the derivation at the first invalid date.
    Reject,
}

/// Options for the feature derivation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivationOptions {
    pub lead_time_cap: LeadTimeCap,
    pub invalid_dates: InvalidDatePolicy,
}

impl DerivationOptions {
    #[must_use]
    pub fn with_lead_time_cap(mut self, cap: LeadTimeCap) -> Self {
        self.lead_time_cap = cap;
        self
    }

    #[must_use]
    pub fn with_invalid_dates(mut self, policy: InvalidDatePolicy) -> Self {
        self.invalid_dates = policy;
        self
    }
}

/// Assumptions behind the cancellation impact estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactAssumptions {
    /// Average nights per recovered booking.
    pub average_nights: f64,
    /// Smallest and largest accepted reduction, in percentage points.
    pub min_reduction: u32,
    pub max_reduction: u32,
}

impl Default for ImpactAssumptions {
    fn default() -> Self {
        Self {
            average_nights: 2.5,
            min_reduction: 5,
            max_reduction: 20,
        }
    }
}

impl ImpactAssumptions {
    /// # Errors
    ///
    /// Rejects a reduction outside the configured range.
    pub fn check_reduction(&self, points: u32) -> Result<()> {
        if points < self.min_reduction || points > self.max_reduction {
            return Err(ModelError::option(
                "reduction",
                format!(
                    "{points} is outside {}-{} percentage points",
                    self.min_reduction, self.max_reduction
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_settings() {
        let profile = ProfileOptions::default();
        assert_eq!(profile.categorical_threshold, 50);
        assert_eq!(profile.top_values, 3);
        assert_eq!(
            DerivationOptions::default().lead_time_cap,
            LeadTimeCap::ObservedMax
        );
    }

    #[test]
    fn reduction_must_be_within_range() {
        let assumptions = ImpactAssumptions::default();
        assert!(assumptions.check_reduction(10).is_ok());
        assert!(assumptions.check_reduction(4).is_err());
        assert!(assumptions.check_reduction(21).is_err());
    }

    #[test]
    fn zero_top_values_is_rejected() {
        let options = ProfileOptions::default().with_top_values(0);
        assert!(options.validate().is_err());
        let options = ProfileOptions::default().with_categorical_threshold(0);
        assert!(options.validate().is_err());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: DerivationOptions =
            serde_json::from_str(r#"{"lead_time_cap":"unbounded"}"#).expect("parse options");
        assert_eq!(options.lead_time_cap, LeadTimeCap::Unbounded);
        assert_eq!(options.invalid_dates, InvalidDatePolicy::Flag);
    }
}
