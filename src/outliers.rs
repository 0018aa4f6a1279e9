//! Outlier detection and distribution-shape classification
//!
//! Outliers use the classic Tukey fences: values strictly outside
//! `[q1 − k·iqr, q3 + k·iqr]` where q1/q3 come from the nearest-rank
//! percentile function (not the floor-index quartile rule) and k is the
//! configured whisker multiplier. Occurrences are counted, not distinct
//! values. Shape classification is a pure mapping from skewness and excess
//! kurtosis magnitudes.

use serde::{Deserialize, Serialize};

use crate::stats::{self, StatsError};

/// Distribution symmetry class from skewness magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionType {
    /// |skewness| ≤ 0.5
    Normal,
    /// 0.5 < |skewness| ≤ 1.0
    ModeratelyAsymmetric,
    /// |skewness| > 1.0
    HighlyAsymmetric,
}

/// Peak sharpness class from excess kurtosis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeakType {
    Normal,
    /// Excess kurtosis > 3
    SharpPeak,
    /// Excess kurtosis < −1
    FlatPeak,
}

/// Shape summary for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStats {
    pub variance: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    pub distribution_type: DistributionType,
    pub peak_type: PeakType,
}

/// Outlier count and rate (percentage of the sample) for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub count: usize,
    /// Percentage of the sample flagged (0–100)
    pub rate_pct: f64,
}

/// Outlier reports per metric plus the combined rate across all three
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    pub download: OutlierReport,
    pub upload: OutlierReport,
    pub ping: OutlierReport,
    /// Combined flagged occurrences over 3·N observations, as a percentage
    pub combined_rate_pct: f64,
}

/// Box-plot support values: quartiles plus whiskers clamped to the observed
/// range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhiskerPlot {
    pub quartiles: stats::Quartiles,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub iqr: f64,
}

/// Values strictly outside the IQR fences, duplicates included
///
/// An empty input yields an empty result rather than an error: "no data" and
/// "no outliers" render identically downstream.
pub fn detect_outliers(values: &[f64], whisker: f64) -> Vec<f64> {
    let (Ok(q1), Ok(q3)) = (
        stats::percentile(values, 25.0),
        stats::percentile(values, 75.0),
    ) else {
        return Vec::new();
    };
    let iqr = q3 - q1;
    let lower = q1 - whisker * iqr;
    let upper = q3 + whisker * iqr;
    values
        .iter()
        .copied()
        .filter(|v| *v < lower || *v > upper)
        .collect()
}

/// Count + rate report over one metric projection
pub fn outlier_report(values: &[f64], whisker: f64) -> OutlierReport {
    let count = detect_outliers(values, whisker).len();
    let rate_pct = if values.is_empty() {
        0.0
    } else {
        count as f64 / values.len() as f64 * 100.0
    };
    OutlierReport { count, rate_pct }
}

/// Box-plot whiskers: `max(min, q1 − k·iqr)` and `min(max, q3 + k·iqr)`
pub fn whisker_plot(values: &[f64], whisker: f64) -> Result<WhiskerPlot, StatsError> {
    let quartiles = stats::quartiles(values)?;
    let iqr = quartiles.iqr();
    Ok(WhiskerPlot {
        quartiles,
        lower_whisker: (quartiles.q1 - whisker * iqr).max(quartiles.min),
        upper_whisker: (quartiles.q3 + whisker * iqr).min(quartiles.max),
        iqr,
    })
}

/// Skewness magnitude → symmetry class (thresholds 0.5 and 1.0)
pub fn classify_skewness(skewness: f64) -> DistributionType {
    let magnitude = skewness.abs();
    if magnitude <= 0.5 {
        DistributionType::Normal
    } else if magnitude <= 1.0 {
        DistributionType::ModeratelyAsymmetric
    } else {
        DistributionType::HighlyAsymmetric
    }
}

/// Excess kurtosis → peak class (>3 sharp, <−1 flat)
pub fn classify_kurtosis(kurtosis: f64) -> PeakType {
    if kurtosis > 3.0 {
        PeakType::SharpPeak
    } else if kurtosis < -1.0 {
        PeakType::FlatPeak
    } else {
        PeakType::Normal
    }
}

/// Full shape summary for one metric projection
///
/// Degenerate inputs (empty, or zero spread where the standardized moments
/// are undefined) surface as errors for the caller to isolate per metric.
pub fn shape_stats(values: &[f64]) -> Result<ShapeStats, StatsError> {
    let mean = stats::mean(values)?;
    let std = stats::std_dev(values, mean)?;
    let variance = stats::variance(values, mean)?;
    let skewness = stats::skewness(values, mean, std)?;
    let kurtosis = stats::kurtosis(values, mean, std)?;
    Ok(ShapeStats {
        variance,
        skewness,
        kurtosis,
        distribution_type: classify_skewness(skewness),
        peak_type: classify_kurtosis(kurtosis),
    })
}

/// Fixed-width histogram buckets (`floor(v / width) · width`), ascending
pub fn fixed_width_buckets(values: &[f64], width: f64) -> Vec<(f64, usize)> {
    if width <= 0.0 {
        return Vec::new();
    }
    let mut buckets = std::collections::BTreeMap::new();
    for v in values {
        let key = ((v / width).floor() * width) as i64;
        *buckets.entry(key).or_insert(0usize) += 1;
    }
    buckets.into_iter().map(|(k, c)| (k as f64, c)).collect()
}

/// Histogram spanning the observed range with a fixed bin count, ascending by
/// bucket start
pub fn span_buckets(values: &[f64], bins: usize) -> Vec<(f64, usize)> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return vec![(min, values.len())];
    }
    let bucket_size = (max - min) / bins as f64;
    let mut buckets = std::collections::BTreeMap::new();
    for v in values {
        let index = ((v - min) / bucket_size).floor() as i64;
        *buckets.entry(index).or_insert(0usize) += 1;
    }
    buckets
        .into_iter()
        .map(|(i, c)| (i as f64 * bucket_size + min, c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_outliers_flags_extreme_value() {
        // Five healthy tests and one collapsed one; nearest-rank gives
        // q1 = q3 = 100, so the fences are [100, 100] and 10 is outside
        let values = [100.0, 100.0, 100.0, 100.0, 100.0, 10.0];
        let outliers = detect_outliers(&values, 1.5);
        assert_eq!(outliers, vec![10.0]);
    }

    #[test]
    fn test_detect_outliers_counts_duplicates() {
        let values = [100.0, 100.0, 100.0, 100.0, 10.0, 10.0];
        assert_eq!(detect_outliers(&values, 1.5).len(), 2);
    }

    #[test]
    fn test_detect_outliers_tame_sequence_empty() {
        let values = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        assert!(detect_outliers(&values, 1.5).is_empty());
    }

    #[test]
    fn test_detect_outliers_empty_input() {
        assert!(detect_outliers(&[], 1.5).is_empty());
    }

    #[test]
    fn test_outlier_report_rate() {
        let values = [100.0, 100.0, 100.0, 100.0, 100.0, 10.0];
        let report = outlier_report(&values, 1.5);
        assert_eq!(report.count, 1);
        assert!((report.rate_pct - 100.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_whisker_plot_clamps_to_observed_range() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        let plot = whisker_plot(&values, 1.5).unwrap();
        assert!(plot.lower_whisker >= plot.quartiles.min);
        assert!(plot.upper_whisker <= plot.quartiles.max);
        assert_eq!(plot.iqr, plot.quartiles.iqr());
    }

    #[test]
    fn test_classify_skewness_thresholds() {
        assert_eq!(classify_skewness(0.0), DistributionType::Normal);
        assert_eq!(classify_skewness(-0.5), DistributionType::Normal);
        assert_eq!(classify_skewness(0.7), DistributionType::ModeratelyAsymmetric);
        assert_eq!(classify_skewness(-1.0), DistributionType::ModeratelyAsymmetric);
        assert_eq!(classify_skewness(1.2), DistributionType::HighlyAsymmetric);
    }

    #[test]
    fn test_classify_kurtosis_thresholds() {
        assert_eq!(classify_kurtosis(0.0), PeakType::Normal);
        assert_eq!(classify_kurtosis(3.5), PeakType::SharpPeak);
        assert_eq!(classify_kurtosis(-1.3), PeakType::FlatPeak);
        assert_eq!(classify_kurtosis(-1.0), PeakType::Normal);
    }

    #[test]
    fn test_shape_stats_uniform_ramp() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let shape = shape_stats(&values).unwrap();
        assert_eq!(shape.distribution_type, DistributionType::Normal);
        assert_eq!(shape.peak_type, PeakType::FlatPeak);
        assert!((shape.variance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_shape_stats_constant_sequence_is_undefined() {
        assert!(shape_stats(&[5.0, 5.0, 5.0]).is_err());
    }

    #[test]
    fn test_fixed_width_buckets() {
        let values = [5.0, 49.0, 50.0, 120.0];
        let buckets = fixed_width_buckets(&values, 50.0);
        assert_eq!(buckets, vec![(0.0, 2), (50.0, 1), (100.0, 1)]);
    }

    #[test]
    fn test_span_buckets_covers_range() {
        let values = [0.0, 5.0, 10.0, 15.0, 20.0];
        let buckets = span_buckets(&values, 4);
        let total: usize = buckets.iter().map(|(_, c)| c).sum();
        assert_eq!(total, values.len());
        assert_eq!(buckets[0].0, 0.0);
    }

    #[test]
    fn test_span_buckets_degenerate_range() {
        let buckets = span_buckets(&[7.0, 7.0, 7.0], 20);
        assert_eq!(buckets, vec![(7.0, 3)]);
    }
}
