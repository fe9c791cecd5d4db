//! Column names of the hotel booking dataset.
//!
//! Source names follow the public hotel-bookings CSV. Derived names are the
//! columns added by the derivation pipeline.

pub const HOTEL: &str = "hotel";
pub const IS_CANCELED: &str = "is_canceled";
pub const LEAD_TIME: &str = "lead_time";
pub const ARRIVAL_YEAR: &str = "arrival_date_year";
pub const ARRIVAL_MONTH: &str = "arrival_date_month";
pub const ARRIVAL_DAY: &str = "arrival_date_day_of_month";
pub const WEEKEND_NIGHTS: &str = "stays_in_weekend_nights";
pub const WEEK_NIGHTS: &str = "stays_in_week_nights";
pub const ADULTS: &str = "adults";
pub const CHILDREN: &str = "children";
pub const BABIES: &str = "babies";
pub const MEAL: &str = "meal";
pub const COUNTRY: &str = "country";
pub const MARKET_SEGMENT: &str = "market_segment";
pub const DISTRIBUTION_CHANNEL: &str = "distribution_channel";
pub const IS_REPEATED_GUEST: &str = "is_repeated_guest";
pub const DEPOSIT_TYPE: &str = "deposit_type";
pub const CUSTOMER_TYPE: &str = "customer_type";
pub const ADR: &str = "adr";

pub const ARRIVAL_DATE: &str = "arrival_date";
pub const ARRIVAL_YEAR_MONTH: &str = "arrival_year_month";
pub const TOTAL_NIGHTS: &str = "total_nights";
pub const TOTAL_GUESTS: &str = "total_guests";
pub const SEASON: &str = "season";
pub const LEAD_TIME_BUCKET: &str = "lead_time_bucket";
pub const ADR_BAND: &str = "adr_band";

/// Columns the core expects in a booking table. Anything else is carried
/// through untouched.
pub const EXPECTED_SOURCE_COLUMNS: [&str; 19] = [
    HOTEL,
    IS_CANCELED,
    LEAD_TIME,
    ARRIVAL_YEAR,
    ARRIVAL_MONTH,
    ARRIVAL_DAY,
    WEEKEND_NIGHTS,
    WEEK_NIGHTS,
    ADULTS,
    CHILDREN,
    BABIES,
    MEAL,
    COUNTRY,
    MARKET_SEGMENT,
    DISTRIBUTION_CHANNEL,
    IS_REPEATED_GUEST,
    DEPOSIT_TYPE,
    CUSTOMER_TYPE,
    ADR,
];

/// Columns produced by the derivation pipeline.
pub const DERIVED_COLUMNS: [&str; 7] = [
    ARRIVAL_DATE,
    ARRIVAL_YEAR_MONTH,
    TOTAL_NIGHTS,
    TOTAL_GUESTS,
    SEASON,
    LEAD_TIME_BUCKET,
    ADR_BAND,
];

/// Returns the expected source columns missing from `present`.
pub fn missing_expected<'a, I>(present: I) -> Vec<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = present.into_iter().collect();
    EXPECTED_SOURCE_COLUMNS
        .iter()
        .copied()
        .filter(|name| !present.contains(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_missing_expected_columns() {
        let missing = missing_expected(EXPECTED_SOURCE_COLUMNS.iter().copied().skip(2));
        assert_eq!(missing, vec![HOTEL, IS_CANCELED]);
    }

    #[test]
    fn derived_columns_do_not_shadow_sources() {
        for derived in DERIVED_COLUMNS {
            assert!(!EXPECTED_SOURCE_COLUMNS.contains(&derived));
        }
    }
}
