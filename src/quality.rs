//! Connection quality scoring
//!
//! The score combines three normalized sub-scores (download, upload, ping)
//! with a stability index and a consistency count. The constants are
//! empirical, tuned for residential fiber connections, and are part of the
//! output contract — they live in [`AnalysisConfig`], not inline.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::measurement::Measurement;
use crate::stats;

/// Quality summary for the working set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Overall score 0–100: mean of the three sub-scores
    pub score: f64,
    pub download_score: f64,
    pub upload_score: f64,
    pub ping_score: f64,
    /// Stability 0–100 from the download/upload variation ratios;
    /// `None` when either mean is zero
    pub stability: Option<f64>,
    /// Tests whose download and upload fall within the consistency band,
    /// averaged across the two metrics
    pub consistent_tests: usize,
    /// Percentage of stored tests that completed. The history only records
    /// completed runs, so this is always 100.
    pub success_rate_pct: f64,
}

/// Score the working set; `None` for an empty set
pub fn quality_report(data: &[Measurement], config: &AnalysisConfig) -> Option<QualityReport> {
    let downloads: Vec<f64> = data.iter().map(|m| m.download).collect();
    let uploads: Vec<f64> = data.iter().map(|m| m.upload).collect();
    let pings: Vec<f64> = data.iter().map(|m| m.ping).collect();

    let download_mean = stats::mean(&downloads).ok()?;
    let upload_mean = stats::mean(&uploads).ok()?;
    let ping_mean = stats::mean(&pings).ok()?;

    let download_score = (download_mean / config.reference_download_mbps * 100.0).min(100.0);
    let upload_score = (upload_mean / config.reference_upload_mbps * 100.0).min(100.0);
    let ping_score =
        (100.0 - (ping_mean - config.ping_base_ms) * config.ping_penalty_per_ms).max(0.0);
    let score = (download_score + upload_score + ping_score) / 3.0;

    let stability = if download_mean == 0.0 || upload_mean == 0.0 {
        None
    } else {
        let download_std = stats::std_dev(&downloads, download_mean).ok()?;
        let upload_std = stats::std_dev(&uploads, upload_mean).ok()?;
        let ratio = download_std / download_mean + upload_std / upload_mean;
        Some((100.0 - ratio * 50.0).max(0.0))
    };

    let consistent_tests = consistent_count(&downloads, download_mean, config.consistency_band)
        .zip(consistent_count(&uploads, upload_mean, config.consistency_band))
        .map(|(d, u)| ((d + u) as f64 / 2.0).round() as usize)
        .unwrap_or(0);

    Some(QualityReport {
        score,
        download_score,
        upload_score,
        ping_score,
        stability,
        consistent_tests,
        success_rate_pct: 100.0,
    })
}

/// Values within `±band` of the mean, relative; undefined for a zero mean
fn consistent_count(values: &[f64], mean: f64, band: f64) -> Option<usize> {
    if mean == 0.0 {
        return None;
    }
    Some(
        values
            .iter()
            .filter(|v| ((*v - mean) / mean).abs() <= band)
            .count(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeZone};

    fn at(day: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, day, 12, 0, 0)
            .unwrap()
    }

    fn record(day: u32, download: f64, upload: f64, ping: f64) -> Measurement {
        Measurement {
            id: day as i64,
            created: at(day),
            download,
            upload,
            ping,
            time: 30.0,
            server_id: 1,
        }
    }

    #[test]
    fn test_perfect_connection_scores_100() {
        let data = vec![record(1, 500.0, 500.0, 1.0), record(2, 500.0, 500.0, 1.0)];
        let q = quality_report(&data, &AnalysisConfig::default()).unwrap();
        assert_eq!(q.download_score, 100.0);
        assert_eq!(q.upload_score, 100.0);
        assert_eq!(q.ping_score, 100.0);
        assert_eq!(q.score, 100.0);
        assert_eq!(q.stability, Some(100.0));
        assert_eq!(q.consistent_tests, 2);
        assert_eq!(q.success_rate_pct, 100.0);
    }

    #[test]
    fn test_download_score_is_capped() {
        let data = vec![record(1, 2000.0, 500.0, 1.0)];
        let q = quality_report(&data, &AnalysisConfig::default()).unwrap();
        assert_eq!(q.download_score, 100.0);
    }

    #[test]
    fn test_ping_score_floors_at_zero() {
        let data = vec![record(1, 500.0, 500.0, 500.0)];
        let q = quality_report(&data, &AnalysisConfig::default()).unwrap();
        assert_eq!(q.ping_score, 0.0);
    }

    #[test]
    fn test_ping_penalty_formula() {
        // ping 11ms: 100 − (11 − 1)·10 = 0; ping 6ms: 100 − 50 = 50
        let data = vec![record(1, 500.0, 500.0, 6.0)];
        let q = quality_report(&data, &AnalysisConfig::default()).unwrap();
        assert_eq!(q.ping_score, 50.0);
    }

    #[test]
    fn test_stability_penalizes_variation() {
        let data = vec![record(1, 50.0, 50.0, 5.0), record(2, 150.0, 150.0, 5.0)];
        let q = quality_report(&data, &AnalysisConfig::default()).unwrap();
        // std/mean = 0.5 for both metrics → 100 − 1.0·50 = 50
        assert!((q.stability.unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_stability_undefined_for_zero_mean() {
        let data = vec![record(1, 0.0, 0.0, 5.0)];
        let q = quality_report(&data, &AnalysisConfig::default()).unwrap();
        assert_eq!(q.stability, None);
        assert_eq!(q.consistent_tests, 0);
    }

    #[test]
    fn test_consistency_band() {
        // mean download = 100: 80 and 120 are inside the ±20% band, 130 is not
        let data = vec![
            record(1, 80.0, 100.0, 5.0),
            record(2, 90.0, 100.0, 5.0),
            record(3, 130.0, 100.0, 5.0),
        ];
        let q = quality_report(&data, &AnalysisConfig::default()).unwrap();
        // downloads: mean 100, consistent = {80, 90} → 2; uploads: all 3
        // round((2 + 3) / 2) = round(2.5) = 3
        assert_eq!(q.consistent_tests, 3);
    }

    #[test]
    fn test_empty_set_yields_none() {
        assert!(quality_report(&[], &AnalysisConfig::default()).is_none());
    }
}
