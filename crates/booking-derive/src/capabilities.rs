//! Which derived features a table's columns allow.

use std::fmt;

use booking_model::columns;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// A derived column and the source columns it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    ArrivalDate,
    ArrivalYearMonth,
    TotalNights,
    TotalGuests,
    Season,
    LeadTimeBucket,
    AdrBand,
}

impl Feature {
    pub const ALL: [Self; 7] = [
        Self::ArrivalDate,
        Self::ArrivalYearMonth,
        Self::TotalNights,
        Self::TotalGuests,
        Self::Season,
        Self::LeadTimeBucket,
        Self::AdrBand,
    ];

    /// Name of the column this feature writes.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::ArrivalDate => columns::ARRIVAL_DATE,
            Self::ArrivalYearMonth => columns::ARRIVAL_YEAR_MONTH,
            Self::TotalNights => columns::TOTAL_NIGHTS,
            Self::TotalGuests => columns::TOTAL_GUESTS,
            Self::Season => columns::SEASON,
            Self::LeadTimeBucket => columns::LEAD_TIME_BUCKET,
            Self::AdrBand => columns::ADR_BAND,
        }
    }

    #[must_use]
    pub const fn sources(self) -> &'static [&'static str] {
        match self {
            Self::ArrivalDate | Self::ArrivalYearMonth => &[
                columns::ARRIVAL_YEAR,
                columns::ARRIVAL_MONTH,
                columns::ARRIVAL_DAY,
            ],
            Self::TotalNights => &[columns::WEEKEND_NIGHTS, columns::WEEK_NIGHTS],
            Self::TotalGuests => &[columns::ADULTS, columns::CHILDREN, columns::BABIES],
            Self::Season => &[columns::ARRIVAL_MONTH],
            Self::LeadTimeBucket => &[columns::LEAD_TIME],
            Self::AdrBand => &[columns::ADR],
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One flag per derivable feature, computed once from the column names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SchemaCapabilities {
    pub arrival_date: bool,
    pub arrival_year_month: bool,
    pub total_nights: bool,
    pub total_guests: bool,
    pub season: bool,
    pub lead_time_bucket: bool,
    pub adr_band: bool,
}

impl SchemaCapabilities {
    pub fn from_columns<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<&str> = names.into_iter().collect();
        let has = |feature: Feature| feature.sources().iter().all(|s| names.contains(s));
        Self {
            arrival_date: has(Feature::ArrivalDate),
            arrival_year_month: has(Feature::ArrivalYearMonth),
            total_nights: has(Feature::TotalNights),
            total_guests: has(Feature::TotalGuests),
            season: has(Feature::Season),
            lead_time_bucket: has(Feature::LeadTimeBucket),
            adr_band: has(Feature::AdrBand),
        }
    }

    pub fn from_frame(df: &DataFrame) -> Self {
        Self::from_columns(df.get_column_names().into_iter().map(|name| name.as_str()))
    }

    #[must_use]
    pub const fn supports(&self, feature: Feature) -> bool {
        match feature {
            Feature::ArrivalDate => self.arrival_date,
            Feature::ArrivalYearMonth => self.arrival_year_month,
            Feature::TotalNights => self.total_nights,
            Feature::TotalGuests => self.total_guests,
            Feature::Season => self.season,
            Feature::LeadTimeBucket => self.lead_time_bucket,
            Feature::AdrBand => self.adr_band,
        }
    }
}
