//! Lead-time risk bands.
//!
//! Buckets are closed on the upper end: `(-inf, 0]`, `(0, 7]`, `(7, 30]`,
//! `(30, 90]`, `(90, 180]` and `(180, cap]`. The cap of the last bucket is
//! the largest lead time seen in the table being bucketed, unless the
//! bands are built unbounded.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the six lead-time ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LeadTimeBucket {
    SameDay,
    OneWeek,
    OneMonth,
    ThreeMonths,
    SixMonths,
    MoreThanSixMonths,
}

impl LeadTimeBucket {
    /// Buckets in ascending lead-time order.
    pub const ALL: [Self; 6] = [
        Self::SameDay,
        Self::OneWeek,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::MoreThanSixMonths,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SameDay => "same-day",
            Self::OneWeek => "1-week",
            Self::OneMonth => "1-month",
            Self::ThreeMonths => "3-months",
            Self::SixMonths => "6-months",
            Self::MoreThanSixMonths => "more-than-6-months",
        }
    }

    /// Inclusive upper boundary in days. The last bucket has none of its own.
    #[must_use]
    pub const fn upper_bound(self) -> Option<i64> {
        match self {
            Self::SameDay => Some(0),
            Self::OneWeek => Some(7),
            Self::OneMonth => Some(30),
            Self::ThreeMonths => Some(90),
            Self::SixMonths => Some(180),
            Self::MoreThanSixMonths => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.label() == label)
    }
}

impl fmt::Display for LeadTimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the upper edge of the last bucket is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadTimeCap {
    /// The maximum lead time observed in the table being derived.
    #[default]
    ObservedMax,
    /// No upper edge: every lead time above 180 days is in the last bucket.
    Unbounded,
}

/// Bucket boundaries resolved for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadTimeBands {
    cap: Option<i64>,
}

impl LeadTimeBands {
    /// Bands whose last bucket ends at `max_observed`.
    #[must_use]
    pub const fn observed(max_observed: i64) -> Self {
        Self {
            cap: Some(max_observed),
        }
    }

    #[must_use]
    pub const fn unbounded() -> Self {
        Self { cap: None }
    }

    /// Resolves the bands for a cap mode and the table's largest lead time.
    ///
    /// An empty table under `ObservedMax` yields bands that accept nothing
    /// past 180 days, which is harmless since there are no values.
    #[must_use]
    pub fn resolve(cap: LeadTimeCap, max_observed: Option<i64>) -> Self {
        match cap {
            LeadTimeCap::ObservedMax => Self {
                cap: Some(max_observed.unwrap_or(0)),
            },
            LeadTimeCap::Unbounded => Self::unbounded(),
        }
    }

    #[must_use]
    pub const fn cap(&self) -> Option<i64> {
        self.cap
    }

    /// Bucket of a lead time, or `None` when it lies beyond the cap.
    #[must_use]
    pub fn classify(&self, lead_time: i64) -> Option<LeadTimeBucket> {
        for bucket in LeadTimeBucket::ALL {
            if let Some(upper) = bucket.upper_bound()
                && lead_time <= upper
            {
                return Some(bucket);
            }
        }
        match self.cap {
            Some(cap) if lead_time > cap => None,
            _ => Some(LeadTimeBucket::MoreThanSixMonths),
        }
    }
}
