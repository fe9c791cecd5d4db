//! Profiling whole tables.

use booking_model::{ColumnKind, ProfileOptions};
use booking_profile::{detect_duplicates, list_categories, profile_table};
use polars::prelude::*;
use proptest::prelude::*;

fn bookings() -> DataFrame {
    df!(
        "hotel" => ["City Hotel", "City Hotel", "Resort Hotel", "City Hotel"],
        "lead_time" => [7i64, 0, 342, 30],
        "adr" => [None::<f64>, None, None, None],
        "country" => [Some("PRT"), Some("GBR"), None, Some("PRT")],
    )
    .unwrap()
}

#[test]
fn one_row_per_column_in_order() {
    let profile = profile_table(&bookings(), &ProfileOptions::default()).unwrap();
    assert_eq!(profile.rows, 4);
    assert_eq!(profile.columns, 4);
    let names: Vec<&str> = profile.summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["hotel", "lead_time", "adr", "country"]);
}

#[test]
fn fully_null_numeric_column() {
    let profile = profile_table(&bookings(), &ProfileOptions::default()).unwrap();
    let adr = profile.column("adr").unwrap();
    assert_eq!(adr.kind, ColumnKind::Numeric);
    assert_eq!(adr.non_null, 0);
    assert_eq!(adr.null_pct, 100.0);
    assert_eq!(adr.unique, 0);
    assert!(adr.numeric.is_none());
    assert_eq!(adr.top_values_display(), "");
}

#[test]
fn numeric_column_gets_statistics_and_top_values() {
    let profile = profile_table(&bookings(), &ProfileOptions::default()).unwrap();
    let lead = profile.column("lead_time").unwrap();
    let stats = lead.numeric.unwrap();
    assert_eq!(stats.mean, 94.75);
    assert_eq!(stats.median, 18.5);
    assert_eq!(stats.min, 0.0);
    assert_eq!(stats.q1, 5.25);
    assert_eq!(stats.q3, 108.0);
    assert_eq!(stats.max, 342.0);
    assert!(lead.top_values.is_some());
}

#[test]
fn categorical_top_values() {
    let profile = profile_table(&bookings(), &ProfileOptions::default()).unwrap();
    let hotel = profile.column("hotel").unwrap();
    insta::assert_snapshot!(hotel.top_values_display(), @"City Hotel (3); Resort Hotel (1)");
    let country = profile.column("country").unwrap();
    assert_eq!(country.null_pct, 25.0);
    assert_eq!(country.top_values_display(), "PRT (2); GBR (1)");
}

#[test]
fn temporal_column_gets_range_and_top_values() {
    let days = Series::new("arrival_date".into(), [16617i32, 17409, 16617])
        .cast(&DataType::Date)
        .unwrap();
    let df = DataFrame::new(vec![days.into_column()]).unwrap();
    let profile = profile_table(&df, &ProfileOptions::default()).unwrap();
    let summary = &profile.summaries[0];
    assert_eq!(summary.kind, ColumnKind::Temporal);
    let range = summary.temporal.as_ref().unwrap();
    assert_eq!(range.min, "2015-07-01");
    assert_eq!(range.max, "2017-08-31");
    assert_eq!(summary.top_values_display(), "2015-07-01 (2); 2017-08-31 (1)");
    assert!(summary.numeric.is_none());
}

#[test]
fn zero_row_table_profiles_to_zero_counts() {
    let df = df!(
        "hotel" => Vec::<&str>::new(),
        "adr" => Vec::<f64>::new(),
    )
    .unwrap();
    let profile = profile_table(&df, &ProfileOptions::default()).unwrap();
    assert_eq!(profile.rows, 0);
    assert_eq!(profile.summaries.len(), 2);
    for summary in &profile.summaries {
        assert_eq!(summary.non_null, 0);
        assert_eq!(summary.null_pct, 0.0);
        assert!(summary.numeric.is_none());
    }
}

#[test]
fn invalid_options_are_rejected() {
    let options = ProfileOptions::default().with_top_values(0);
    assert!(profile_table(&bookings(), &options).is_err());
}

#[test]
fn profiling_leaves_the_table_untouched() {
    let df = bookings();
    let before = df.clone();
    profile_table(&df, &ProfileOptions::default()).unwrap();
    assert!(df.equals_missing(&before));
}

#[test]
fn duplicates_and_categories() {
    let df = df!(
        "hotel" => ["City Hotel", "City Hotel", "Resort Hotel"],
        "meal" => ["BB", "BB", "HB"],
    )
    .unwrap();
    let report = detect_duplicates(&df).unwrap();
    assert_eq!(report.duplicate_rows, 1);
    assert_eq!(report.member_rows, vec![0, 1]);

    let categories = list_categories(&df).unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].column, "hotel");
    assert_eq!(categories[0].values, ["City Hotel", "Resort Hotel"]);
    assert_eq!(categories[1].values, ["BB", "HB"]);
}

proptest! {
    #[test]
    fn null_percent_matches_counts(cells in proptest::collection::vec(proptest::option::of(0i64..100), 1..40)) {
        let rows = cells.len();
        let present = cells.iter().flatten().count();
        let df = DataFrame::new(vec![Series::new("lead_time".into(), cells).into_column()]).unwrap();
        let profile = profile_table(&df, &ProfileOptions::default()).unwrap();
        let summary = &profile.summaries[0];
        let expected = ((rows - present) as f64 / rows as f64 * 100.0 * 100.0).round() / 100.0;
        prop_assert_eq!(summary.non_null, present);
        prop_assert_eq!(summary.null_pct, expected);
        prop_assert!((0.0..=100.0).contains(&summary.null_pct));
    }
}
