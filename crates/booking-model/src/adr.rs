//! Average-daily-rate price bands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Price band of a booking's average daily rate.
///
/// Bands are `(0, 50]`, `(50, 100]`, `(100, 150]`, `(150, 200]` and
/// `(200, 500]`. Free bookings and rates above 500 have no band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AdrBand {
    UpTo50,
    UpTo100,
    UpTo150,
    UpTo200,
    Above200,
}

impl AdrBand {
    pub const ALL: [Self; 5] = [
        Self::UpTo50,
        Self::UpTo100,
        Self::UpTo150,
        Self::UpTo200,
        Self::Above200,
    ];

    /// Upper edge of the last band.
    pub const CEILING: f64 = 500.0;

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UpTo50 => "€0-50",
            Self::UpTo100 => "€51-100",
            Self::UpTo150 => "€101-150",
            Self::UpTo200 => "€151-200",
            Self::Above200 => ">€200",
        }
    }

    #[must_use]
    pub fn classify(adr: f64) -> Option<Self> {
        if adr.is_nan() || adr <= 0.0 || adr > Self::CEILING {
            return None;
        }
        let band = if adr <= 50.0 {
            Self::UpTo50
        } else if adr <= 100.0 {
            Self::UpTo100
        } else if adr <= 150.0 {
            Self::UpTo150
        } else if adr <= 200.0 {
            Self::UpTo200
        } else {
            Self::Above200
        };
        Some(band)
    }
}

impl fmt::Display for AdrBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_band_edges() {
        assert_eq!(AdrBand::classify(0.0), None);
        assert_eq!(AdrBand::classify(-6.38), None);
        assert_eq!(AdrBand::classify(0.5), Some(AdrBand::UpTo50));
        assert_eq!(AdrBand::classify(50.0), Some(AdrBand::UpTo50));
        assert_eq!(AdrBand::classify(50.01), Some(AdrBand::UpTo100));
        assert_eq!(AdrBand::classify(200.0), Some(AdrBand::UpTo200));
        assert_eq!(AdrBand::classify(500.0), Some(AdrBand::Above200));
        assert_eq!(AdrBand::classify(5400.0), None);
    }
}
