//! Presentation order of grouping keys.

use std::cmp::Ordering;

use booking_model::{AdrBand, BookingStatus, LeadTimeBucket, Month, Season, columns};

/// Position of `key` in the fixed order of `dimension`, if it has one.
///
/// Booking status, seasons, lead-time buckets, price bands and month names
/// have an order of their own; every other dimension returns `None`.
pub fn semantic_rank(dimension: &str, key: &str) -> Option<usize> {
    match dimension {
        columns::IS_CANCELED => BookingStatus::ALL.iter().position(|s| s.label() == key),
        columns::SEASON => Season::ALL.iter().position(|s| s.label() == key),
        columns::LEAD_TIME_BUCKET => LeadTimeBucket::ALL.iter().position(|b| b.label() == key),
        columns::ADR_BAND => AdrBand::ALL.iter().position(|b| b.label() == key),
        columns::ARRIVAL_MONTH => Month::from_name(key).map(|m| m.number() as usize),
        _ => None,
    }
}

/// True when the dimension has a fixed order.
pub fn has_semantic_order(dimension: &str) -> bool {
    matches!(
        dimension,
        columns::IS_CANCELED
            | columns::SEASON
            | columns::LEAD_TIME_BUCKET
            | columns::ADR_BAND
            | columns::ARRIVAL_MONTH
    )
}

/// Compares keys as numbers when both parse, as text otherwise.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}

/// Compares keys of one dimension in presentation order.
///
/// Unknown labels of a fixed-order dimension sort after the known ones.
pub fn compare_in_dimension(dimension: &str, a: &str, b: &str) -> Ordering {
    if has_semantic_order(dimension) {
        let rank = |key: &str| semantic_rank(dimension, key).unwrap_or(usize::MAX);
        rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
    } else {
        compare_keys(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seasons_follow_presentation_order() {
        let mut keys = vec!["Winter", "Summer", "Autumn", "Spring"];
        keys.sort_by(|a, b| compare_in_dimension(columns::SEASON, a, b));
        assert_eq!(keys, ["Spring", "Summer", "Autumn", "Winter"]);
    }

    #[test]
    fn buckets_follow_lead_time_order() {
        let mut keys = vec!["more-than-6-months", "same-day", "3-months", "1-week"];
        keys.sort_by(|a, b| compare_in_dimension(columns::LEAD_TIME_BUCKET, a, b));
        assert_eq!(keys, ["same-day", "1-week", "3-months", "more-than-6-months"]);
    }

    #[test]
    fn completed_precedes_canceled() {
        assert_eq!(
            compare_in_dimension(columns::IS_CANCELED, "Canceled", "Completed"),
            Ordering::Greater
        );
    }

    #[test]
    fn numeric_keys_sort_numerically() {
        let mut keys = vec!["10", "2", "1"];
        keys.sort_by(|a, b| compare_keys(a, b));
        assert_eq!(keys, ["1", "2", "10"]);
        assert_eq!(compare_keys("2016-01", "2015-12"), Ordering::Greater);
    }

    #[test]
    fn other_dimensions_have_no_rank() {
        assert_eq!(semantic_rank(columns::HOTEL, "City Hotel"), None);
        assert_eq!(semantic_rank(columns::ARRIVAL_MONTH, "March"), Some(3));
    }
}
