//! Configuration for the analysis engine
//!
//! Every heuristic constant of the scoring and alerting rules lives here as a
//! named, documented field instead of an inline literal, so it can be tuned
//! and tested independently. The defaults reproduce the historical dashboard
//! output exactly.

use serde::{Deserialize, Serialize};

/// Tunable constants for quality scoring, outlier detection, and alert rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Download speed (Mbps) that maps to a quality sub-score of 100
    pub reference_download_mbps: f64,

    /// Upload speed (Mbps) that maps to a quality sub-score of 100
    pub reference_upload_mbps: f64,

    /// Ping (ms) at which the ping sub-score is exactly 100
    pub ping_base_ms: f64,

    /// Sub-score points lost per millisecond of ping above the base
    pub ping_penalty_per_ms: f64,

    /// IQR multiplier for the outlier fences (`q1 − k·iqr`, `q3 + k·iqr`)
    pub iqr_whisker: f64,

    /// Relative band around the mean inside which a test counts as
    /// "consistent" (0.2 = ±20%)
    pub consistency_band: f64,

    /// Alert rule 1: warn when mean download falls below this (Mbps)
    pub min_mean_download_mbps: f64,

    /// Alert rule 2: warn when mean upload falls below this (Mbps)
    pub min_mean_upload_mbps: f64,

    /// Alert rule 3: error when mean ping exceeds this (ms)
    pub max_mean_ping_ms: f64,

    /// Alert rule 4: warn when the download coefficient of variation exceeds
    /// this percentage
    pub max_download_cv_pct: f64,

    /// Alert rule 5: informational finding when the download outlier count
    /// exceeds this fraction of the sample size
    pub outlier_rate_threshold: f64,

    /// Alert rule 6: error when the chronological second half's mean download
    /// drops below this fraction of the first half's (0.9 = 10% degradation)
    pub degradation_ratio: f64,

    /// Window size for rolling statistics and the trend moving average
    pub default_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reference_download_mbps: 500.0,
            reference_upload_mbps: 500.0,
            ping_base_ms: 1.0,
            ping_penalty_per_ms: 10.0,
            iqr_whisker: 1.5,
            consistency_band: 0.2,
            min_mean_download_mbps: 100.0,
            min_mean_upload_mbps: 50.0,
            max_mean_ping_ms: 50.0,
            max_download_cv_pct: 30.0,
            outlier_rate_threshold: 0.10,
            degradation_ratio: 0.90,
            default_window: 10,
        }
    }
}

impl AnalysisConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.reference_download_mbps <= 0.0 || self.reference_upload_mbps <= 0.0 {
            return Err(format!(
                "reference speeds must be positive, got download={} upload={}",
                self.reference_download_mbps, self.reference_upload_mbps
            ));
        }

        if self.iqr_whisker <= 0.0 {
            return Err(format!("iqr_whisker must be positive, got {}", self.iqr_whisker));
        }

        if !(0.0..=1.0).contains(&self.consistency_band) {
            return Err(format!(
                "consistency_band must be in [0, 1], got {}",
                self.consistency_band
            ));
        }

        if !(0.0..=1.0).contains(&self.outlier_rate_threshold) {
            return Err(format!(
                "outlier_rate_threshold must be in [0, 1], got {}",
                self.outlier_rate_threshold
            ));
        }

        if !(0.0..=1.0).contains(&self.degradation_ratio) {
            return Err(format!(
                "degradation_ratio must be in [0, 1], got {}",
                self.degradation_ratio
            ));
        }

        if self.default_window < 2 {
            return Err(format!(
                "default_window must be >= 2 for rolling statistics, got {}",
                self.default_window
            ));
        }

        Ok(())
    }
}
