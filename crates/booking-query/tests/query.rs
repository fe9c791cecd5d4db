//! Filtering and aggregation over a derived booking table.

use booking_derive::derive_features;
use booking_model::{DerivationOptions, FilterCriteria, YearRange};
use booking_query::{Preset, aggregate, apply_filters, headline_metrics};
use polars::prelude::*;
use proptest::prelude::*;

fn ten_bookings() -> DataFrame {
    df!(
        "hotel" => [
            "City Hotel", "City Hotel", "City Hotel", "City Hotel", "City Hotel", "City Hotel",
            "Resort Hotel", "Resort Hotel", "Resort Hotel", "Resort Hotel",
        ],
        "is_canceled" => [1i64, 1, 1, 0, 0, 0, 1, 0, 0, 0],
        "arrival_date_year" => [2015i64, 2016, 2017, 2015, 2016, 2017, 2015, 2016, 2017, 2017],
        "arrival_date_month" => [
            "January", "April", "July", "October", "December",
            "August", "July", "March", "November", "June",
        ],
        "arrival_date_day_of_month" => [1i64, 2, 3, 4, 5, 6, 7, 8, 9, 10],
        "lead_time" => [0i64, 7, 8, 30, 45, 90, 120, 181, 300, 5],
        "customer_type" => [
            "Transient", "Contract", "Transient", "Group", "Transient",
            "Transient", "Contract", "Transient", "Group", "Transient",
        ],
        "adr" => [80.0, 120.0, 45.0, 210.0, 95.0, 0.0, 150.0, 60.0, 99.0, 130.0],
    )
    .unwrap()
}

fn enriched() -> DataFrame {
    derive_features(&ten_bookings(), &DerivationOptions::default())
        .unwrap()
        .frame
}

#[test]
fn city_hotel_cancellation_rate_is_half() {
    let df = enriched();
    assert_eq!(headline_metrics(&df).unwrap().cancellation_rate, Some(40.0));

    let city = apply_filters(&df, &FilterCriteria::all().with_hotel("City Hotel")).unwrap();
    let metrics = headline_metrics(&city).unwrap();
    assert_eq!(metrics.bookings, 6);
    assert_eq!(metrics.cancellations, Some(3));
    assert_eq!(metrics.cancellation_rate, Some(50.0));
}

#[test]
fn lead_time_preset_uses_bucket_order() {
    let result = aggregate(&enriched(), &Preset::LeadTimeCancellationRate.breakdown()).unwrap();
    let keys: Vec<&str> = result.rows.iter().map(|r| r.keys[0].as_str()).collect();
    assert_eq!(
        keys,
        ["same-day", "1-week", "1-month", "3-months", "6-months", "more-than-6-months"]
    );
    assert_eq!(result.value(&["same-day"], "cancellation_rate"), Some(100.0));
    assert_eq!(result.value(&["1-week"], "cancellation_rate"), Some(50.0));
    assert_eq!(result.total_count(), 10);
}

#[test]
fn season_preset_splits_by_status() {
    let result = aggregate(&enriched(), &Preset::SeasonCancellations.breakdown()).unwrap();
    let keys: Vec<(String, String)> = result
        .rows
        .iter()
        .map(|r| (r.keys[0].clone(), r.keys[1].clone()))
        .collect();
    let first: Vec<&str> = keys.iter().map(|(season, _)| season.as_str()).collect();
    assert_eq!(
        first,
        ["Spring", "Spring", "Summer", "Summer", "Autumn", "Winter", "Winter"]
    );
    assert_eq!(result.find(&["Summer", "Canceled"]).unwrap().count, 2);
}

#[test]
fn adr_band_preset_ignores_free_bookings() {
    let result = aggregate(&enriched(), &Preset::AdrBandCancellationRate.breakdown()).unwrap();
    assert_eq!(result.total_count(), 9);
    let keys: Vec<&str> = result.rows.iter().map(|r| r.keys[0].as_str()).collect();
    assert_eq!(keys, ["€0-50", "€51-100", "€101-150", ">€200"]);
}

#[test]
fn customer_hotel_preset_renders_as_frame() {
    let result = aggregate(&enriched(), &Preset::CustomerTypeByHotel.breakdown()).unwrap();
    let frame = result.to_frame().unwrap();
    insta::assert_snapshot!(
        frame.get_column_names().into_iter().map(|n| n.as_str()).collect::<Vec<_>>().join(","),
        @"customer_type,hotel,count,cancellation_rate"
    );
    assert_eq!(result.rows[0].keys, ["Transient", "City Hotel"]);
    assert_eq!(result.rows[0].count, 4);
}

#[test]
fn timeline_is_chronological() {
    let result = aggregate(&enriched(), &Preset::MonthlyTimeline.breakdown()).unwrap();
    let periods: Vec<&str> = result.rows.iter().map(|r| r.keys[0].as_str()).collect();
    let mut sorted = periods.clone();
    sorted.sort_unstable();
    assert_eq!(periods, sorted);
    assert_eq!(periods.first(), Some(&"2015-01"));
}

fn criteria(hotel: Option<bool>, customer: Option<u8>, years: Option<(i32, i32)>) -> FilterCriteria {
    let mut criteria = FilterCriteria::all();
    if let Some(city) = hotel {
        criteria = criteria.with_hotel(if city { "City Hotel" } else { "Resort Hotel" });
    }
    if let Some(idx) = customer {
        criteria = criteria.with_customer_type(["Transient", "Contract", "Group"][usize::from(idx % 3)]);
    }
    if let Some((a, b)) = years {
        criteria = criteria.with_years(YearRange::new(a.min(b), a.max(b)).unwrap());
    }
    criteria
}

proptest! {
    #[test]
    fn filter_composition_is_order_independent(
        hotel in proptest::option::of(any::<bool>()),
        customer in proptest::option::of(0u8..3),
        years in proptest::option::of((2015i32..=2017, 2015i32..=2017)),
    ) {
        let df = enriched();
        let only_hotel = criteria(hotel, None, None);
        let only_customer = criteria(None, customer, None);
        let only_years = criteria(None, None, years);
        let combined = criteria(hotel, customer, years);

        let at_once = apply_filters(&df, &combined).unwrap();
        let forward = apply_filters(
            &apply_filters(&apply_filters(&df, &only_hotel).unwrap(), &only_customer).unwrap(),
            &only_years,
        )
        .unwrap();
        let backward = apply_filters(
            &apply_filters(&apply_filters(&df, &only_years).unwrap(), &only_customer).unwrap(),
            &only_hotel,
        )
        .unwrap();

        prop_assert!(at_once.equals_missing(&forward));
        prop_assert!(at_once.equals_missing(&backward));
    }
}
