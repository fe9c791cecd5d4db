//! Filter criteria supplied by the control surface.
//!
//! An unconstrained dimension is `Selection::Any`, never a magic category
//! name, so a real category called "All" stays an ordinary value.

use serde::{Deserialize, Serialize};

use crate::columns;
use crate::error::{ModelError, Result};

/// Either no restriction or an exact match on one value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T> {
    Any,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::Any
    }
}

impl<T> Selection<T> {
    #[must_use]
    pub const fn as_only(&self) -> Option<&T> {
        match self {
            Self::Any => None,
            Self::Only(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Any, Self::Only)
    }
}

/// Inclusive range of arrival years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "YearBounds")]
pub struct YearRange {
    start: i32,
    end: i32,
}

/// Unchecked `YearRange` fields as they appear in config files.
#[derive(Deserialize)]
struct YearBounds {
    start: i32,
    end: i32,
}

impl TryFrom<YearBounds> for YearRange {
    type Error = ModelError;

    fn try_from(bounds: YearBounds) -> Result<Self> {
        Self::new(bounds.start, bounds.end)
    }
}

impl YearRange {
    /// Builds a range, rejecting `start > end`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvertedYearRange`] when the bounds are reversed.
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(ModelError::InvertedYearRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> i32 {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> i32 {
        self.end
    }

    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    #[must_use]
    pub const fn covers(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// One active restriction over a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Predicate {
    Equals { column: &'static str, value: String },
    YearWithin { column: &'static str, range: YearRange },
}

impl Predicate {
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Equals { column, .. } | Self::YearWithin { column, .. } => column,
        }
    }
}

/// Selected filter values for one interaction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub hotel: Selection<String>,
    #[serde(default)]
    pub customer_type: Selection<String>,
    #[serde(default)]
    pub market_segment: Selection<String>,
    #[serde(default)]
    pub distribution_channel: Selection<String>,
    #[serde(default)]
    pub deposit_type: Selection<String>,
    #[serde(default)]
    pub years: Option<YearRange>,
}

impl FilterCriteria {
    /// Criteria that keep every record.
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_hotel(mut self, hotel: impl Into<String>) -> Self {
        self.hotel = Selection::Only(hotel.into());
        self
    }

    #[must_use]
    pub fn with_customer_type(mut self, customer_type: impl Into<String>) -> Self {
        self.customer_type = Selection::Only(customer_type.into());
        self
    }

    #[must_use]
    pub fn with_market_segment(mut self, segment: impl Into<String>) -> Self {
        self.market_segment = Selection::Only(segment.into());
        self
    }

    #[must_use]
    pub fn with_distribution_channel(mut self, channel: impl Into<String>) -> Self {
        self.distribution_channel = Selection::Only(channel.into());
        self
    }

    #[must_use]
    pub fn with_deposit_type(mut self, deposit_type: impl Into<String>) -> Self {
        self.deposit_type = Selection::Only(deposit_type.into());
        self
    }

    #[must_use]
    pub fn with_years(mut self, years: YearRange) -> Self {
        self.years = Some(years);
        self
    }

    /// True when no dimension is constrained.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.predicates().is_empty()
    }

    /// Active predicates only; unconstrained dimensions produce nothing.
    #[must_use]
    pub fn predicates(&self) -> Vec<Predicate> {
        let categorical = [
            (columns::HOTEL, &self.hotel),
            (columns::CUSTOMER_TYPE, &self.customer_type),
            (columns::MARKET_SEGMENT, &self.market_segment),
            (columns::DISTRIBUTION_CHANNEL, &self.distribution_channel),
            (columns::DEPOSIT_TYPE, &self.deposit_type),
        ];
        let mut predicates: Vec<Predicate> = categorical
            .into_iter()
            .filter_map(|(column, selection)| {
                selection.as_only().map(|value| Predicate::Equals {
                    column,
                    value: value.clone(),
                })
            })
            .collect();
        if let Some(range) = self.years {
            predicates.push(Predicate::YearWithin {
                column: columns::ARRIVAL_YEAR,
                range,
            });
        }
        predicates
    }

    /// Checks the criteria against the values the control surface offers.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::YearsOutOfBounds`] when the selected years leave
    /// the observed bounds.
    pub fn validate(&self, choices: &FilterChoices) -> Result<()> {
        if let (Some(range), Some(bounds)) = (self.years, choices.year_bounds)
            && !bounds.covers(&range)
        {
            return Err(ModelError::YearsOutOfBounds {
                start: range.start,
                end: range.end,
                min: bounds.start,
                max: bounds.end,
            });
        }
        Ok(())
    }
}

/// Values available to the control surface for the loaded table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterChoices {
    pub hotels: Vec<String>,
    pub customer_types: Vec<String>,
    pub market_segments: Vec<String>,
    pub distribution_channels: Vec<String>,
    pub deposit_types: Vec<String>,
    pub year_bounds: Option<YearRange>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconstrained_criteria_have_no_predicates() {
        assert!(FilterCriteria::all().predicates().is_empty());
        assert!(FilterCriteria::all().is_unconstrained());
    }

    #[test]
    fn a_category_named_all_is_an_ordinary_value() {
        let criteria = FilterCriteria::all().with_hotel("All");
        assert_eq!(
            criteria.predicates(),
            vec![Predicate::Equals {
                column: columns::HOTEL,
                value: "All".to_string(),
            }]
        );
    }

    #[test]
    fn rejects_inverted_year_range() {
        assert_eq!(
            YearRange::new(2017, 2015),
            Err(ModelError::InvertedYearRange {
                start: 2017,
                end: 2015
            })
        );
    }

    #[test]
    fn deserializing_checks_the_bounds() {
        let range: YearRange = serde_json::from_str(r#"{"start": 2015, "end": 2016}"#).unwrap();
        assert_eq!(range, YearRange::new(2015, 2016).unwrap());

        let error = serde_json::from_str::<YearRange>(r#"{"start": 2017, "end": 2015}"#)
            .unwrap_err()
            .to_string();
        assert!(error.contains("2017 is after 2015"), "{error}");
    }

    #[test]
    fn validates_years_against_bounds() {
        let choices = FilterChoices {
            year_bounds: Some(YearRange::new(2015, 2017).unwrap()),
            ..FilterChoices::default()
        };
        let inside = FilterCriteria::all().with_years(YearRange::new(2016, 2017).unwrap());
        assert!(inside.validate(&choices).is_ok());

        let outside = FilterCriteria::all().with_years(YearRange::new(2014, 2016).unwrap());
        assert!(matches!(
            outside.validate(&choices),
            Err(ModelError::YearsOutOfBounds { min: 2015, .. })
        ));
    }

    #[test]
    fn selection_from_option() {
        assert_eq!(Selection::<String>::from(None), Selection::Any);
        assert_eq!(
            Selection::from(Some("Resort Hotel".to_string())),
            Selection::Only("Resort Hotel".to_string())
        );
    }
}
