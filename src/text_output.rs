//! Plain-text rendering of an [`AnalysisReport`]
//!
//! The layout follows the exported connection reports: one section per
//! derived structure, fixed column order, `N/A` wherever a statistic is
//! undefined for the working set. Output is deterministic for a given report.

use std::fmt::Write as _;

use crate::alerts::Severity;
use crate::measurement::Metric;
use crate::report::{AnalysisReport, DistributionStats, MetricPercentiles};

/// Render the full report as plain text
pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();

    out.push_str("CONNECTION ANALYSIS REPORT\n");
    out.push_str("==========================\n\n");
    let _ = writeln!(out, "Tests analyzed: {}", report.header.total_tests);
    let _ = writeln!(
        out,
        "Period: {} to {}",
        report.header.first_test.format("%Y-%m-%d %H:%M"),
        report.header.last_test.format("%Y-%m-%d %H:%M")
    );

    out.push_str("\n📈 GENERAL STATISTICS\n");
    for metric in Metric::ALL {
        push_distribution(&mut out, metric, report.stats.get(metric));
    }
    let _ = writeln!(
        out,
        "  Test time: avg {:.1} s, max {:.1} s, total {:.0} s",
        report.time.avg, report.time.max, report.time.total
    );

    out.push_str("\n⭐ QUALITY SCORE\n");
    match &report.quality {
        Some(q) => {
            let _ = writeln!(out, "  Overall: {:.1}/100", q.score);
            let _ = writeln!(
                out,
                "  Download {:.1} | Upload {:.1} | Ping {:.1}",
                q.download_score, q.upload_score, q.ping_score
            );
            let _ = writeln!(out, "  Stability: {}", fmt_opt(q.stability, ""));
            let _ = writeln!(out, "  Consistent tests: {}", q.consistent_tests);
        }
        None => out.push_str("  N/A\n"),
    }

    out.push_str("\n📊 PERCENTILES\n");
    out.push_str("  Metric      P10     P25     P50     P75     P90     P95     P99\n");
    for metric in Metric::ALL {
        push_percentiles(&mut out, metric, report.percentiles.get(metric));
    }

    out.push_str("\n🔍 OUTLIERS (1.5×IQR)\n");
    let _ = writeln!(
        out,
        "  Download: {} ({:.1}%) | Upload: {} ({:.1}%) | Ping: {} ({:.1}%)",
        report.outliers.download.count,
        report.outliers.download.rate_pct,
        report.outliers.upload.count,
        report.outliers.upload.rate_pct,
        report.outliers.ping.count,
        report.outliers.ping.rate_pct
    );
    let _ = writeln!(
        out,
        "  Combined rate: {:.1}%",
        report.outliers.combined_rate_pct
    );

    out.push_str("\n📐 DISTRIBUTION SHAPE\n");
    for metric in Metric::ALL {
        match report.shape.get(metric) {
            Some(shape) => {
                let _ = writeln!(
                    out,
                    "  {}: skewness {:.3} ({:?}), kurtosis {:.3} ({:?})",
                    metric.label(),
                    shape.skewness,
                    shape.distribution_type,
                    shape.kurtosis,
                    shape.peak_type
                );
            }
            None => {
                let _ = writeln!(out, "  {}: N/A", metric.label());
            }
        }
    }

    out.push_str("\n🕐 DAY PERIODS\n");
    for period in &report.temporal.day_periods {
        let _ = writeln!(
            out,
            "  {:<10} ({} tests): download {} | upload {} | ping {}",
            period.period.label(),
            period.count,
            fmt_opt(period.download, " Mbps"),
            fmt_opt(period.upload, " Mbps"),
            fmt_opt(period.ping, " ms")
        );
    }

    out.push_str("\n📉 STABILITY WINDOWS\n");
    let _ = writeln!(out, "  Window size: {} tests", report.rolling.window);
    for point in &report.rolling.download {
        let _ = writeln!(
            out,
            "  {}: mean {:.1} Mbps, std {:.1}, stability {}",
            point.anchor.format("%Y-%m-%d %H:%M"),
            point.mean,
            point.std_dev,
            fmt_opt(point.stability, "")
        );
    }
    if report.rolling.download.is_empty() {
        out.push_str("  (not enough tests for a full window)\n");
    }

    out.push_str("\n🖥️  SERVERS\n");
    for segment in &report.segments {
        let _ = writeln!(
            out,
            "  Server {}: {} tests, download {:.1} Mbps, upload {:.1} Mbps, ping {:.1} ms, std {:.1}",
            segment.server_id,
            segment.count,
            segment.download,
            segment.upload,
            segment.ping,
            segment.stability
        );
    }

    out.push_str("\n⚖️  FIRST HALF vs SECOND HALF\n");
    for metric in Metric::ALL {
        match report.halves.get(metric) {
            Some(halves) => {
                let _ = writeln!(
                    out,
                    "  {}: {:.1} → {:.1} {} ({})",
                    metric.label(),
                    halves.first_mean,
                    halves.second_mean,
                    metric.unit(),
                    fmt_change(halves.change_pct)
                );
            }
            None => {
                let _ = writeln!(out, "  {}: N/A", metric.label());
            }
        }
    }

    out.push_str("\n📏 TREND (per test)\n");
    for metric in Metric::ALL {
        match report.trend.get(metric) {
            Some(trend) => {
                let _ = writeln!(
                    out,
                    "  {}: slope {:+.4} {}/test",
                    metric.label(),
                    trend.slope,
                    metric.unit()
                );
            }
            None => {
                let _ = writeln!(out, "  {}: N/A", metric.label());
            }
        }
    }

    out.push_str("\n🚨 ALERTS\n");
    for alert in &report.alerts {
        let _ = writeln!(
            out,
            "  {} {}: {}",
            severity_icon(alert.severity),
            alert.title,
            alert.message
        );
    }

    out
}

fn push_distribution(out: &mut String, metric: Metric, stats: &DistributionStats) {
    let _ = writeln!(
        out,
        "  {}: avg {:.2} | median {:.2} | min {:.2} | max {:.2} | std {:.2} {}",
        metric.label(),
        stats.avg,
        stats.median,
        stats.min,
        stats.max,
        stats.std,
        metric.unit()
    );
}

fn push_percentiles(out: &mut String, metric: Metric, p: &MetricPercentiles) {
    let _ = writeln!(
        out,
        "  {:<9} {:>7.1} {:>7.1} {:>7.1} {:>7.1} {:>7.1} {:>7.1} {:>7.1}",
        metric.label(),
        p.p10,
        p.p25,
        p.p50,
        p.p75,
        p.p90,
        p.p95,
        p.p99
    );
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "✅",
        Severity::Info => "ℹ️ ",
        Severity::Warning => "⚠️ ",
        Severity::Error => "❌",
    }
}

fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.1}{unit}"),
        None => "N/A".to_string(),
    }
}

fn fmt_change(change_pct: Option<f64>) -> String {
    match change_pct {
        Some(c) => format!("{c:+.1}%"),
        None => "N/A".to_string(),
    }
}
