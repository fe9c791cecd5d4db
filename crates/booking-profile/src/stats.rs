//! Numeric summaries computed by Polars.

use booking_model::NumericStats;
use polars::prelude::*;

/// Rounds to two decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn quantile(values: &Float64Chunked, q: f64) -> Option<f64> {
    values.quantile(q, QuantileMethod::Linear).ok().flatten()
}

/// Full numeric summary of the non-null values, or `None` when there are
/// none. Quantiles interpolate linearly; the deviation is the sample one.
pub fn numeric_stats(values: &Float64Chunked) -> Option<NumericStats> {
    let present = values.len() - values.null_count();
    if present == 0 {
        return None;
    }
    let std = if present > 1 { values.std(1) } else { None };
    Some(NumericStats {
        mean: round2(values.mean()?),
        median: round2(values.median()?),
        std: std.map(round2),
        min: round2(values.min()?),
        q1: round2(quantile(values, 0.25)?),
        q3: round2(quantile(values, 0.75)?),
        max: round2(values.max()?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunked(values: &[f64]) -> Float64Chunked {
        Float64Chunked::from_slice("values".into(), values)
    }

    #[test]
    fn quartiles_interpolate_between_ranks() {
        let stats = numeric_stats(&chunked(&[4.0, 1.0, 3.0, 2.0])).unwrap();
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q3, 3.25);
    }

    #[test]
    fn single_value_has_no_std() {
        let stats = numeric_stats(&chunked(&[42.0])).unwrap();
        assert_eq!(stats.mean, 42.0);
        assert_eq!(stats.median, 42.0);
        assert_eq!(stats.std, None);
        assert_eq!(stats.q1, 42.0);
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        let stats = numeric_stats(&chunked(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])).unwrap();
        assert_eq!(stats.std, Some(2.14));
    }

    #[test]
    fn summary_is_rounded() {
        let stats = numeric_stats(&chunked(&[1.0, 2.0, 2.0])).unwrap();
        assert_eq!(stats.mean, 1.67);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 2.0);
        assert_eq!(stats.std, Some(0.58));
    }

    #[test]
    fn nulls_are_ignored_and_empty_has_no_summary() {
        let values: Float64Chunked = [Some(1.0), None, Some(3.0)].into_iter().collect();
        assert_eq!(numeric_stats(&values).unwrap().mean, 2.0);
        assert!(numeric_stats(&chunked(&[])).is_none());
        let nulls: Float64Chunked = [None::<f64>, None].into_iter().collect();
        assert!(numeric_stats(&nulls).is_none());
    }
}
