//! Rule-based alerts over the working set's aggregate statistics
//!
//! Rules are evaluated independently and appended in declaration order, not
//! by severity, so the emitted sequence is deterministic for a given working
//! set. When nothing fires a single synthetic success finding is emitted.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::measurement::{Measurement, Metric};
use crate::outliers::detect_outliers;
use crate::segments::compare_halves;
use crate::stats;

/// Alert severity, ordered by urgency of the finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// One human-readable finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(severity: Severity, title: &str, message: String) -> Self {
        Self {
            severity,
            title: title.to_string(),
            message,
        }
    }
}

/// Evaluate the fixed rule set against the working set
///
/// Returns an empty sequence only for an empty working set; callers
/// short-circuit that case before rendering.
pub fn evaluate_alerts(data: &[Measurement], config: &AnalysisConfig) -> Vec<Alert> {
    if data.is_empty() {
        return Vec::new();
    }

    let downloads: Vec<f64> = data.iter().map(|m| m.download).collect();
    let uploads: Vec<f64> = data.iter().map(|m| m.upload).collect();
    let pings: Vec<f64> = data.iter().map(|m| m.ping).collect();

    // non-empty set: means are defined
    let download_mean = stats::mean(&downloads).unwrap_or(0.0);
    let upload_mean = stats::mean(&uploads).unwrap_or(0.0);
    let ping_mean = stats::mean(&pings).unwrap_or(0.0);

    let mut alerts = Vec::new();

    // Rule 1: mean download below target
    if download_mean < config.min_mean_download_mbps {
        alerts.push(Alert::new(
            Severity::Warning,
            "Low download speed",
            format!(
                "Mean download is {:.2} Mbps, below the {:.0} Mbps target",
                download_mean, config.min_mean_download_mbps
            ),
        ));
    }

    // Rule 2: mean upload below target
    if upload_mean < config.min_mean_upload_mbps {
        alerts.push(Alert::new(
            Severity::Warning,
            "Low upload speed",
            format!(
                "Mean upload is {:.2} Mbps, below the {:.0} Mbps target",
                upload_mean, config.min_mean_upload_mbps
            ),
        ));
    }

    // Rule 3: mean ping above limit
    if ping_mean > config.max_mean_ping_ms {
        alerts.push(Alert::new(
            Severity::Error,
            "High latency",
            format!(
                "Mean ping is {:.2} ms, above the {:.0} ms limit",
                ping_mean, config.max_mean_ping_ms
            ),
        ));
    }

    // Rule 4: download too variable (skipped when CV is undefined)
    if let Ok(download_std) = stats::std_dev(&downloads, download_mean) {
        if let Ok(cv) = stats::coefficient_of_variation(download_std, download_mean) {
            if cv > config.max_download_cv_pct {
                alerts.push(Alert::new(
                    Severity::Warning,
                    "Unstable download speed",
                    format!(
                        "Download varies {:.1}% around its mean (limit {:.0}%)",
                        cv, config.max_download_cv_pct
                    ),
                ));
            }
        }
    }

    // Rule 5: too many download outliers
    let outlier_count = detect_outliers(&downloads, config.iqr_whisker).len();
    if outlier_count as f64 > config.outlier_rate_threshold * data.len() as f64 {
        alerts.push(Alert::new(
            Severity::Info,
            "Frequent outliers",
            format!(
                "{} of {} download measurements fall outside the expected range",
                outlier_count,
                data.len()
            ),
        ));
    }

    // Rule 6: download degraded between the chronological halves
    if let Some(halves) = compare_halves(data, Metric::Download) {
        if halves.first_mean > 0.0 && halves.second_mean < config.degradation_ratio * halves.first_mean
        {
            let decrease_pct = (1.0 - halves.second_mean / halves.first_mean) * 100.0;
            alerts.push(Alert::new(
                Severity::Error,
                "Download degradation",
                format!(
                    "Mean download dropped {:.1}% between the first and second half of the period",
                    decrease_pct
                ),
            ));
        }
    }

    if alerts.is_empty() {
        alerts.push(Alert::new(
            Severity::Success,
            "Connection healthy",
            "All quality checks passed for the current selection".to_string(),
        ));
    }

    tracing::debug!(count = alerts.len(), "evaluated alert rules");
    alerts
}
