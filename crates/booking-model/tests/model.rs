//! Properties of the fixed mappings and the filter vocabulary.

use booking_model::{
    FilterCriteria, LeadTimeBands, LeadTimeBucket, Month, Season, YearRange,
};
use proptest::prelude::*;

#[test]
fn every_month_maps_to_exactly_one_season() {
    let mut per_season = [0usize; 4];
    for month in Month::ALL {
        let season = Season::from_month_name(month.name()).expect("known month");
        let idx = Season::ALL
            .iter()
            .position(|candidate| *candidate == season)
            .expect("season in presentation order");
        per_season[idx] += 1;
    }
    assert_eq!(per_season, [3, 3, 3, 3]);
}

#[test]
fn lead_time_scenarios() {
    let bands = LeadTimeBands::observed(737);
    assert_eq!(bands.classify(7), Some(LeadTimeBucket::OneWeek));
    assert_eq!(bands.classify(0), Some(LeadTimeBucket::SameDay));
}

#[test]
fn criteria_serialize_with_explicit_selections() {
    let criteria = FilterCriteria::all()
        .with_hotel("City Hotel")
        .with_years(YearRange::new(2015, 2016).unwrap());
    insta::assert_json_snapshot!(criteria, @r#"
    {
      "hotel": {
        "only": "City Hotel"
      },
      "customer_type": "any",
      "market_segment": "any",
      "distribution_channel": "any",
      "deposit_type": "any",
      "years": {
        "start": 2015,
        "end": 2016
      }
    }
    "#);
}

proptest! {
    #[test]
    fn lead_time_buckets_partition_the_range(lead in 0i64..=737, cap in 181i64..=2000) {
        prop_assume!(lead <= cap);
        let bands = LeadTimeBands::observed(cap);
        let bucket = bands.classify(lead).expect("within cap");
        let position = LeadTimeBucket::ALL.iter().position(|b| *b == bucket).unwrap();
        // The value must exceed the previous bucket's edge and not exceed its own.
        if position > 0 {
            let lower = LeadTimeBucket::ALL[position - 1].upper_bound().unwrap();
            prop_assert!(lead > lower);
        }
        if let Some(upper) = bucket.upper_bound() {
            prop_assert!(lead <= upper);
        }
    }

    #[test]
    fn unbounded_bands_accept_any_non_negative_value(lead in 0i64..i64::MAX) {
        prop_assert!(LeadTimeBands::unbounded().classify(lead).is_some());
    }

    #[test]
    fn month_names_parse_case_insensitively(idx in 0usize..12, upper in any::<bool>()) {
        let month = Month::ALL[idx];
        let name = if upper { month.name().to_uppercase() } else { month.name().to_lowercase() };
        prop_assert_eq!(Month::from_name(&name), Some(month));
    }

    #[test]
    fn year_range_accepts_ordered_bounds(start in 1990i32..2030, span in 0i32..10) {
        let range = YearRange::new(start, start + span).unwrap();
        prop_assert!(range.contains(start));
        prop_assert!(range.contains(start + span));
        prop_assert!(!range.contains(start + span + 1));
    }
}
