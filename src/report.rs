//! One-pass assembly of every derived structure for a working set
//!
//! An [`AnalysisReport`] is a deterministic, side-effect-free function of the
//! filtered measurement set and the configuration. It is rebuilt wholesale on
//! every filter change and never patched incrementally. Degenerate metrics
//! (zero spread, zero mean) surface as `None` in their own section so that a
//! single undefined statistic never aborts the rest of the recompute.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::measurement::{project, Measurement, Metric};
use crate::outliers::{self, OutlierSummary, ShapeStats, WhiskerPlot};
use crate::quality::{quality_report, QualityReport};
use crate::segments::{compare_halves, server_segments, HalfComparison, SegmentStats};
use crate::stats::{self, Quartiles, StatsError};
use crate::temporal::{
    self, HourBucket, MonthBucket, PeriodStats, RollingPoint, TrendLine, TrendPoint, WeekdayBucket,
};
use crate::alerts;

/// Percentile levels reported per metric
pub const PERCENTILE_LEVELS: [f64; 7] = [10.0, 25.0, 50.0, 75.0, 90.0, 95.0, 99.0];

/// Fixed histogram bucket width for download speeds (Mbps)
pub const DOWNLOAD_BUCKET_MBPS: f64 = 50.0;

/// Bin count for the range-spanning upload and ping histograms
pub const HISTOGRAM_BINS: usize = 20;

/// Descriptive statistics for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub avg: f64,
    pub max: f64,
    pub min: f64,
    pub median: f64,
    pub std: f64,
    pub quartiles: Quartiles,
}

/// Test-duration statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeStats {
    pub avg: f64,
    pub max: f64,
    /// Total seconds spent testing
    pub total: f64,
}

/// Nearest-rank percentile values for one metric at [`PERCENTILE_LEVELS`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPercentiles {
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// One value per metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerMetric<T> {
    pub download: T,
    pub upload: T,
    pub ping: T,
}

impl<T> PerMetric<T> {
    pub fn get(&self, metric: Metric) -> &T {
        match metric {
            Metric::Download => &self.download,
            Metric::Upload => &self.upload,
            Metric::Ping => &self.ping,
        }
    }
}

/// Working-set header: size and covered date range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportHeader {
    pub total_tests: usize,
    pub first_test: DateTime<FixedOffset>,
    pub last_test: DateTime<FixedOffset>,
}

/// Histogram buckets as `(bucket start, count)` pairs, ascending
///
/// Download uses fixed 50-Mbps buckets; upload and ping span their observed
/// range with a fixed bin count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histograms {
    pub download: Vec<(f64, usize)>,
    pub upload: Vec<(f64, usize)>,
    pub ping: Vec<(f64, usize)>,
}

/// Calendar and rolling aggregations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalProfiles {
    pub hourly: Vec<HourBucket>,
    pub weekday: Vec<WeekdayBucket>,
    pub monthly: Vec<MonthBucket>,
    pub day_periods: Vec<PeriodStats>,
}

/// Rolling and trend series for the two speed metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingSeries {
    /// Window size used for the non-overlapping windows
    pub window: usize,
    pub download: Vec<RollingPoint>,
    pub upload: Vec<RollingPoint>,
    /// Growing-left-window moving averages for the trend charts
    pub download_moving_avg: Vec<TrendPoint>,
    pub upload_moving_avg: Vec<TrendPoint>,
}

/// The complete derived-metrics bundle for one filtered measurement set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub header: ReportHeader,
    pub stats: PerMetric<DistributionStats>,
    pub time: TimeStats,
    pub quality: Option<QualityReport>,
    pub percentiles: PerMetric<MetricPercentiles>,
    pub outliers: OutlierSummary,
    /// `None` per metric when the standardized moments are undefined
    pub shape: PerMetric<Option<ShapeStats>>,
    pub whiskers: PerMetric<WhiskerPlot>,
    pub histograms: Histograms,
    pub temporal: TemporalProfiles,
    pub rolling: RollingSeries,
    pub segments: Vec<SegmentStats>,
    pub halves: PerMetric<Option<HalfComparison>>,
    /// OLS degradation trend; `None` for a single-point set
    pub trend: PerMetric<Option<TrendLine>>,
    pub alerts: Vec<alerts::Alert>,
}

impl AnalysisReport {
    /// Build the full report over a working set
    ///
    /// Fails fast on an empty set — callers short-circuit rendering instead
    /// of propagating NaN into every section.
    pub fn build(data: &[Measurement], config: &AnalysisConfig) -> Result<Self, StatsError> {
        if data.is_empty() {
            return Err(StatsError::EmptyInput);
        }

        let window = if config.default_window >= 2 {
            config.default_window
        } else {
            temporal::adaptive_window(data.len(), 20)
        };

        let report = Self {
            header: header(data),
            stats: per_metric(data, distribution_stats)?,
            time: time_stats(data)?,
            quality: quality_report(data, config),
            percentiles: per_metric(data, metric_percentiles)?,
            outliers: outlier_summary(data, config),
            shape: PerMetric {
                download: outliers::shape_stats(&project(data, Metric::Download)).ok(),
                upload: outliers::shape_stats(&project(data, Metric::Upload)).ok(),
                ping: outliers::shape_stats(&project(data, Metric::Ping)).ok(),
            },
            whiskers: PerMetric {
                download: outliers::whisker_plot(&project(data, Metric::Download), config.iqr_whisker)?,
                upload: outliers::whisker_plot(&project(data, Metric::Upload), config.iqr_whisker)?,
                ping: outliers::whisker_plot(&project(data, Metric::Ping), config.iqr_whisker)?,
            },
            histograms: Histograms {
                download: outliers::fixed_width_buckets(
                    &project(data, Metric::Download),
                    DOWNLOAD_BUCKET_MBPS,
                ),
                upload: outliers::span_buckets(&project(data, Metric::Upload), HISTOGRAM_BINS),
                ping: outliers::span_buckets(&project(data, Metric::Ping), HISTOGRAM_BINS),
            },
            temporal: TemporalProfiles {
                hourly: temporal::hourly_profile(data),
                weekday: temporal::weekday_profile(data),
                monthly: temporal::monthly_profile(data),
                day_periods: temporal::day_period_profile(data),
            },
            rolling: RollingSeries {
                window,
                download: temporal::rolling_windows(data, Metric::Download, window),
                upload: temporal::rolling_windows(data, Metric::Upload, window),
                download_moving_avg: temporal::moving_average(data, Metric::Download, window),
                upload_moving_avg: temporal::moving_average(data, Metric::Upload, window),
            },
            segments: server_segments(data),
            halves: PerMetric {
                download: compare_halves(data, Metric::Download),
                upload: compare_halves(data, Metric::Upload),
                ping: compare_halves(data, Metric::Ping),
            },
            trend: PerMetric {
                download: temporal::trend_line(data, Metric::Download).ok(),
                upload: temporal::trend_line(data, Metric::Upload).ok(),
                ping: temporal::trend_line(data, Metric::Ping).ok(),
            },
            alerts: alerts::evaluate_alerts(data, config),
        };
        tracing::debug!(tests = data.len(), "built analysis report");
        Ok(report)
    }
}

fn header(data: &[Measurement]) -> ReportHeader {
    // data is non-empty here
    let first = data.iter().map(|m| m.created).min().unwrap_or_default();
    let last = data.iter().map(|m| m.created).max().unwrap_or_default();
    ReportHeader {
        total_tests: data.len(),
        first_test: first,
        last_test: last,
    }
}

fn per_metric<T, F>(data: &[Measurement], f: F) -> Result<PerMetric<T>, StatsError>
where
    F: Fn(&[f64]) -> Result<T, StatsError>,
{
    Ok(PerMetric {
        download: f(&project(data, Metric::Download))?,
        upload: f(&project(data, Metric::Upload))?,
        ping: f(&project(data, Metric::Ping))?,
    })
}

fn distribution_stats(values: &[f64]) -> Result<DistributionStats, StatsError> {
    let avg = stats::mean(values)?;
    let quartiles = stats::quartiles(values)?;
    Ok(DistributionStats {
        avg,
        max: quartiles.max,
        min: quartiles.min,
        median: quartiles.median,
        std: stats::std_dev(values, avg)?,
        quartiles,
    })
}

fn metric_percentiles(values: &[f64]) -> Result<MetricPercentiles, StatsError> {
    Ok(MetricPercentiles {
        p10: stats::percentile(values, 10.0)?,
        p25: stats::percentile(values, 25.0)?,
        p50: stats::percentile(values, 50.0)?,
        p75: stats::percentile(values, 75.0)?,
        p90: stats::percentile(values, 90.0)?,
        p95: stats::percentile(values, 95.0)?,
        p99: stats::percentile(values, 99.0)?,
    })
}

fn time_stats(data: &[Measurement]) -> Result<TimeStats, StatsError> {
    let times: Vec<f64> = data.iter().map(|m| m.time).collect();
    let avg = stats::mean(&times)?;
    Ok(TimeStats {
        avg,
        max: times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        total: times.iter().sum(),
    })
}

fn outlier_summary(data: &[Measurement], config: &AnalysisConfig) -> OutlierSummary {
    let download = outliers::outlier_report(&project(data, Metric::Download), config.iqr_whisker);
    let upload = outliers::outlier_report(&project(data, Metric::Upload), config.iqr_whisker);
    let ping = outliers::outlier_report(&project(data, Metric::Ping), config.iqr_whisker);
    let observations = data.len() * 3;
    let combined_rate_pct = if observations == 0 {
        0.0
    } else {
        (download.count + upload.count + ping.count) as f64 / observations as f64 * 100.0
    };
    OutlierSummary {
        download,
        upload,
        ping,
        combined_rate_pct,
    }
}
