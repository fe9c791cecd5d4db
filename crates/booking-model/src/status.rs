//! Booking outcome as shown in charts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a booking, read from the 0/1 cancellation flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    Completed,
    Canceled,
}

impl BookingStatus {
    /// Presentation order: completed first.
    pub const ALL: [Self; 2] = [Self::Completed, Self::Canceled];

    /// Zero is completed, one is canceled; other flags have no status.
    #[must_use]
    pub fn from_flag(flag: f64) -> Option<Self> {
        if flag == 0.0 {
            Some(Self::Completed)
        } else if flag == 1.0 {
            Some(Self::Canceled)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Canceled => "Canceled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
