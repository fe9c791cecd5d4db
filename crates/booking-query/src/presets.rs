//! Canned breakdowns behind each dashboard chart.

use std::fmt;
use std::str::FromStr;

use booking_model::columns;

use crate::aggregate::{Breakdown, Metric, RowConstraint, SortOrder};
use crate::error::QueryError;

/// Longest stay shown in the nights-per-stay chart.
pub const MAX_CHART_NIGHTS: f64 = 14.0;
/// Longest stay used when relating lead time to stay length.
pub const MAX_LEAD_NIGHTS: f64 = 20.0;
/// Countries shown in the country charts.
pub const TOP_COUNTRIES: usize = 10;

/// A named dashboard breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    HotelDistribution,
    BookingStatus,
    CustomerType,
    MealPlan,
    GuestsPerBooking,
    NightsPerStay,
    MonthlyTimeline,
    SeasonCancellations,
    LeadTimeCancellationRate,
    LeadTimeDistribution,
    LeadTimeNights,
    DistributionChannel,
    MarketSegmentCancellationRate,
    RepeatGuest,
    TopCountries,
    TopCountriesCancellationRate,
    DepositType,
    AdrBandCancellationRate,
    CustomerTypeByHotel,
}

impl Preset {
    pub const ALL: [Self; 19] = [
        Self::HotelDistribution,
        Self::BookingStatus,
        Self::CustomerType,
        Self::MealPlan,
        Self::GuestsPerBooking,
        Self::NightsPerStay,
        Self::MonthlyTimeline,
        Self::SeasonCancellations,
        Self::LeadTimeCancellationRate,
        Self::LeadTimeDistribution,
        Self::LeadTimeNights,
        Self::DistributionChannel,
        Self::MarketSegmentCancellationRate,
        Self::RepeatGuest,
        Self::TopCountries,
        Self::TopCountriesCancellationRate,
        Self::DepositType,
        Self::AdrBandCancellationRate,
        Self::CustomerTypeByHotel,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HotelDistribution => "hotels",
            Self::BookingStatus => "status",
            Self::CustomerType => "customer-types",
            Self::MealPlan => "meals",
            Self::GuestsPerBooking => "guests",
            Self::NightsPerStay => "nights",
            Self::MonthlyTimeline => "timeline",
            Self::SeasonCancellations => "seasons",
            Self::LeadTimeCancellationRate => "lead-time-cancellations",
            Self::LeadTimeDistribution => "lead-time",
            Self::LeadTimeNights => "lead-time-nights",
            Self::DistributionChannel => "channels",
            Self::MarketSegmentCancellationRate => "market-segments",
            Self::RepeatGuest => "repeat-guests",
            Self::TopCountries => "countries",
            Self::TopCountriesCancellationRate => "country-cancellations",
            Self::DepositType => "deposits",
            Self::AdrBandCancellationRate => "adr-bands",
            Self::CustomerTypeByHotel => "customer-hotel-cancellations",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::HotelDistribution => "Bookings by hotel",
            Self::BookingStatus => "Completed vs canceled bookings",
            Self::CustomerType => "Bookings by customer type",
            Self::MealPlan => "Bookings by meal plan",
            Self::GuestsPerBooking => "Guests per booking",
            Self::NightsPerStay => "Nights per stay (up to 14)",
            Self::MonthlyTimeline => "Monthly bookings by hotel",
            Self::SeasonCancellations => "Completed vs canceled by season",
            Self::LeadTimeCancellationRate => "Cancellation rate by lead time",
            Self::LeadTimeDistribution => "Bookings by lead time",
            Self::LeadTimeNights => "Stay length by lead time (up to 20 nights)",
            Self::DistributionChannel => "Cancellation rate by distribution channel",
            Self::MarketSegmentCancellationRate => "Cancellation rate by market segment",
            Self::RepeatGuest => "Cancellation rate of repeat guests",
            Self::TopCountries => "Top 10 countries by bookings",
            Self::TopCountriesCancellationRate => "Cancellation rate of the top 10 countries",
            Self::DepositType => "Cancellation and completion rate by deposit type",
            Self::AdrBandCancellationRate => "Cancellation rate by price band",
            Self::CustomerTypeByHotel => "Cancellation rate by customer type and hotel",
        }
    }

    /// The breakdown this chart is drawn from.
    #[must_use]
    pub fn breakdown(self) -> Breakdown {
        match self {
            Self::HotelDistribution => Breakdown::by(columns::HOTEL),
            Self::BookingStatus => Breakdown::by(columns::IS_CANCELED),
            Self::CustomerType => Breakdown::by(columns::CUSTOMER_TYPE),
            Self::MealPlan => Breakdown::by(columns::MEAL),
            Self::GuestsPerBooking => {
                Breakdown::by(columns::TOTAL_GUESTS).with_sort(SortOrder::KeyAsc)
            }
            Self::NightsPerStay => Breakdown::by(columns::TOTAL_NIGHTS)
                .with_constraint(RowConstraint::at_most(columns::TOTAL_NIGHTS, MAX_CHART_NIGHTS))
                .with_sort(SortOrder::KeyAsc),
            Self::MonthlyTimeline => Breakdown::by(columns::ARRIVAL_YEAR_MONTH)
                .then_by(columns::HOTEL)
                .with_sort(SortOrder::KeyAsc),
            Self::SeasonCancellations => Breakdown::by(columns::SEASON)
                .then_by(columns::IS_CANCELED)
                .with_metric(Metric::CancellationRate),
            Self::LeadTimeCancellationRate => Breakdown::by(columns::LEAD_TIME_BUCKET)
                .with_metric(Metric::Cancellations)
                .with_metric(Metric::CancellationRate),
            Self::LeadTimeDistribution => Breakdown::by(columns::LEAD_TIME_BUCKET),
            Self::LeadTimeNights => Breakdown::by(columns::LEAD_TIME_BUCKET)
                .with_constraint(RowConstraint::at_most(columns::TOTAL_NIGHTS, MAX_LEAD_NIGHTS))
                .with_metric(Metric::mean(columns::TOTAL_NIGHTS))
                .with_metric(Metric::median(columns::TOTAL_NIGHTS)),
            Self::DistributionChannel => {
                Breakdown::by(columns::DISTRIBUTION_CHANNEL).with_metric(Metric::CancellationRate)
            }
            Self::MarketSegmentCancellationRate => Breakdown::by(columns::MARKET_SEGMENT)
                .with_metric(Metric::Cancellations)
                .with_metric(Metric::CancellationRate)
                .with_sort(SortOrder::MetricDesc(1)),
            Self::RepeatGuest => Breakdown::by(columns::IS_REPEATED_GUEST)
                .with_metric(Metric::CancellationRate)
                .with_sort(SortOrder::KeyAsc),
            Self::TopCountries => Breakdown::by(columns::COUNTRY)
                .with_top(TOP_COUNTRIES)
                .with_sort(SortOrder::CountDesc),
            Self::TopCountriesCancellationRate => Breakdown::by(columns::COUNTRY)
                .with_top(TOP_COUNTRIES)
                .with_metric(Metric::CancellationRate)
                .with_sort(SortOrder::MetricDesc(0)),
            Self::DepositType => Breakdown::by(columns::DEPOSIT_TYPE)
                .with_metric(Metric::CancellationRate)
                .with_metric(Metric::CompletionRate),
            Self::AdrBandCancellationRate => Breakdown::by(columns::ADR_BAND)
                .with_constraint(RowConstraint::greater_than(columns::ADR, 0.0))
                .with_metric(Metric::Cancellations)
                .with_metric(Metric::CancellationRate),
            Self::CustomerTypeByHotel => Breakdown::by(columns::CUSTOMER_TYPE)
                .then_by(columns::HOTEL)
                .with_metric(Metric::CancellationRate),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QueryError::UnknownPreset {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert!("pie-chart".parse::<Preset>().is_err());
    }

    #[test]
    fn status_chart_uses_status_order() {
        let breakdown = Preset::BookingStatus.breakdown();
        assert_eq!(breakdown.dimensions, [columns::IS_CANCELED]);
        assert_eq!(breakdown.sort, SortOrder::Presentation);
    }

    #[test]
    fn every_preset_is_a_valid_request() {
        for preset in Preset::ALL {
            let breakdown = preset.breakdown();
            assert!(!breakdown.dimensions.is_empty() && breakdown.dimensions.len() <= 2);
            if let SortOrder::MetricDesc(index) = breakdown.sort {
                assert!(index < breakdown.metrics.len(), "{preset}");
            }
        }
    }
}
