//! Month names and seasons.
//!
//! The booking table stores the arrival month as an English month name.
//! Both lookups here are fixed tables: a name outside them is not an error,
//! it simply has no month and no season.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Calendar month, parsed from the English month name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Self; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// Looks up a month by its English name.
    ///
    /// Matching ignores surrounding whitespace and ASCII case. Abbreviations
    /// are not accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|month| month.name().eq_ignore_ascii_case(trimmed))
    }

    /// Month number, 1 through 12.
    #[must_use]
    pub const fn number(self) -> u32 {
        self as u32 + 1
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    #[must_use]
    pub const fn season(self) -> Season {
        match self {
            Self::December | Self::January | Self::February => Season::Winter,
            Self::March | Self::April | Self::May => Season::Spring,
            Self::June | Self::July | Self::August => Season::Summer,
            Self::September | Self::October | Self::November => Season::Autumn,
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Meteorological season of the arrival month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Presentation order used by every season chart.
    pub const ALL: [Self; 4] = [Self::Spring, Self::Summer, Self::Autumn, Self::Winter];

    /// Season of an English month name, or `None` for an unknown name.
    pub fn from_month_name(name: &str) -> Option<Self> {
        Month::from_name(name).map(Month::season)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Autumn => "Autumn",
            Self::Winter => "Winter",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|season| season.label() == label)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_numbers_follow_calendar_order() {
        for (idx, month) in Month::ALL.iter().enumerate() {
            assert_eq!(month.number() as usize, idx + 1);
        }
    }

    #[test]
    fn parses_month_names_loosely() {
        assert_eq!(Month::from_name("July"), Some(Month::July));
        assert_eq!(Month::from_name("  december "), Some(Month::December));
        assert_eq!(Month::from_name("Jul"), None);
        assert_eq!(Month::from_name(""), None);
    }

    #[test]
    fn winter_spans_the_year_boundary() {
        assert_eq!(Season::from_month_name("December"), Some(Season::Winter));
        assert_eq!(Season::from_month_name("January"), Some(Season::Winter));
        assert_eq!(Season::from_month_name("February"), Some(Season::Winter));
        assert_eq!(Season::from_month_name("March"), Some(Season::Spring));
        assert_eq!(Season::from_month_name("Smarch"), None);
    }

    #[test]
    fn season_labels_round_trip() {
        for season in Season::ALL {
            assert_eq!(Season::from_label(season.label()), Some(season));
        }
    }
}
