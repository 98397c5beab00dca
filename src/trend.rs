//! Summary statistics over a yearly anomaly series.
//!
//! A year without a reported anomaly counts as an anomaly of `0.0`. This pulls
//! averages towards zero for sparse series; it is kept as-is so summaries stay
//! comparable with previously published tables.

use crate::remote::series::YearlySeries;
use ordered_float::OrderedFloat;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendDirection {
    Warming,
    Cooling,
    /// Fewer than two data points.
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Warming => "warming",
            TrendDirection::Cooling => "cooling",
            TrendDirection::Stable => "stable",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statistics of one series, rounded to 3 decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendStatistics {
    pub avg_anomaly: f64,
    pub min_anomaly: f64,
    pub max_anomaly: f64,
    pub direction: TrendDirection,
    /// Absolute difference between the means of the later and earlier half.
    pub magnitude: f64,
    pub latest_anomaly: f64,
    pub latest_year: i32,
}

/// Returns `None` for an empty series.
///
/// The chronologically sorted anomalies are split at `n / 2`; the trend is
/// "warming" when the later half has the higher mean and "cooling" otherwise.
pub fn trend_statistics(series: &YearlySeries) -> Option<TrendStatistics> {
    let (latest_year, _) = series.latest()?;
    let anomalies: Vec<f64> = series
        .iter()
        .map(|(_, v)| v.anomaly.unwrap_or(0.0))
        .collect();

    let min_anomaly = anomalies.iter().copied().map(OrderedFloat).min()?.into_inner();
    let max_anomaly = anomalies.iter().copied().map(OrderedFloat).max()?.into_inner();
    let latest_anomaly = *anomalies.last()?;

    let (direction, magnitude) = if anomalies.len() >= 2 {
        let (first, second) = anomalies.split_at(anomalies.len() / 2);
        let first_mean = mean(first);
        let second_mean = mean(second);
        let direction = if second_mean > first_mean {
            TrendDirection::Warming
        } else {
            TrendDirection::Cooling
        };
        (direction, (second_mean - first_mean).abs())
    } else {
        (TrendDirection::Stable, 0.0)
    };

    Some(TrendStatistics {
        avg_anomaly: round_to(mean(&anomalies), 3),
        min_anomaly: round_to(min_anomaly, 3),
        max_anomaly: round_to(max_anomaly, 3),
        direction,
        magnitude: round_to(magnitude, 3),
        latest_anomaly: round_to(latest_anomaly, 3),
        latest_year,
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rounds half to even, so `0.0625` becomes `0.062` at 3 decimals.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::series::YearValue;

    fn series(points: &[(i32, Option<f64>)]) -> YearlySeries {
        points
            .iter()
            .map(|(year, anomaly)| (*year, YearValue::new(None, *anomaly)))
            .collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_warming_series() {
        let stats = trend_statistics(&series(&[
            (2000, Some(0.1)),
            (2001, Some(0.2)),
            (2002, Some(0.5)),
            (2003, Some(0.6)),
        ]))
        .unwrap();
        assert_eq!(stats.direction, TrendDirection::Warming);
        assert_close(stats.magnitude, 0.4);
        assert_close(stats.avg_anomaly, 0.35);
        assert_close(stats.min_anomaly, 0.1);
        assert_close(stats.max_anomaly, 0.6);
        assert_eq!(stats.latest_year, 2003);
        assert_close(stats.latest_anomaly, 0.6);
    }

    #[test]
    fn test_cooling_and_equal_halves() {
        let cooling = trend_statistics(&series(&[(1990, Some(0.4)), (1991, Some(0.1))])).unwrap();
        assert_eq!(cooling.direction, TrendDirection::Cooling);
        assert_close(cooling.magnitude, 0.3);

        let flat = trend_statistics(&series(&[(1990, Some(0.2)), (1991, Some(0.2))])).unwrap();
        assert_eq!(flat.direction, TrendDirection::Cooling);
        assert_close(flat.magnitude, 0.0);
    }

    #[test]
    fn test_odd_length_gives_later_half_the_extra_point() {
        // first half [0.0], second half [0.3, 0.6]
        let stats = trend_statistics(&series(&[
            (2010, Some(0.0)),
            (2011, Some(0.3)),
            (2012, Some(0.6)),
        ]))
        .unwrap();
        assert_eq!(stats.direction, TrendDirection::Warming);
        assert_close(stats.magnitude, 0.45);
    }

    #[test]
    fn test_single_point_is_stable() {
        let stats = trend_statistics(&series(&[(2024, Some(1.234_56))])).unwrap();
        assert_eq!(stats.direction, TrendDirection::Stable);
        assert_close(stats.magnitude, 0.0);
        assert_close(stats.avg_anomaly, 1.235);
        assert_eq!(stats.latest_year, 2024);
    }

    #[test]
    fn test_exact_ties_round_to_even() {
        let stats = trend_statistics(&series(&[(2024, Some(0.0625))])).unwrap();
        assert_eq!(stats.avg_anomaly, 0.062);
        assert_eq!(stats.latest_anomaly, 0.062);
        assert_eq!(round_to(28.125, 2), 28.12);
        assert_eq!(round_to(-0.0625, 3), -0.062);
    }

    #[test]
    fn test_empty_series_has_no_statistics() {
        assert_eq!(trend_statistics(&YearlySeries::default()), None);
    }

    #[test]
    fn test_missing_anomaly_counts_as_zero() {
        let stats = trend_statistics(&series(&[
            (2000, Some(0.4)),
            (2001, None),
            (2002, Some(0.8)),
            (2003, None),
        ]))
        .unwrap();
        assert_close(stats.avg_anomaly, 0.3);
        assert_close(stats.min_anomaly, 0.0);
        assert_close(stats.max_anomaly, 0.8);
        // halves [0.4, 0.0] and [0.8, 0.0]
        assert_eq!(stats.direction, TrendDirection::Warming);
        assert_close(stats.magnitude, 0.2);
        assert_close(stats.latest_anomaly, 0.0);
        assert_eq!(stats.latest_year, 2003);
    }

    #[test]
    fn test_years_are_ordered_numerically() {
        // Insertion order must not matter.
        let stats = trend_statistics(&series(&[
            (2003, Some(0.6)),
            (2000, Some(0.1)),
            (2002, Some(0.5)),
            (2001, Some(0.2)),
        ]))
        .unwrap();
        assert_eq!(stats.direction, TrendDirection::Warming);
        assert_eq!(stats.latest_year, 2003);
    }
}
