//! Segmentation: per-server aggregates and before/after comparison
//!
//! The half-split comparison is defined over the chronological sort: the
//! first half is the older portion, the second half the newer one. The
//! historical dashboard sliced its newest-first storage array directly, which
//! silently inverted the halves; the ordering is made explicit here (see
//! DESIGN.md).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::measurement::{project, sorted_chronological, Measurement, Metric};
use crate::stats;

/// Aggregate statistics for one test server
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub server_id: i64,
    pub download: f64,
    pub upload: f64,
    pub ping: f64,
    pub count: usize,
    /// Population std-dev of download — the per-server stability measure
    pub stability: f64,
}

/// Before/after comparison of one metric over the chronological halves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HalfComparison {
    /// Mean over the older half `[0, N/2)`
    pub first_mean: f64,
    /// Mean over the newer half `[N/2, N)`
    pub second_mean: f64,
    /// Relative change in percent (`(second − first) / first · 100`);
    /// `None` when the first half's mean is zero
    pub change_pct: Option<f64>,
}

/// Per-server aggregates, ascending by server id
pub fn server_segments(data: &[Measurement]) -> Vec<SegmentStats> {
    let mut groups: BTreeMap<i64, Vec<&Measurement>> = BTreeMap::new();
    for m in data {
        groups.entry(m.server_id).or_default().push(m);
    }
    groups
        .into_iter()
        .map(|(server_id, group)| {
            let downloads: Vec<f64> = group.iter().map(|m| m.download).collect();
            let uploads: Vec<f64> = group.iter().map(|m| m.upload).collect();
            let pings: Vec<f64> = group.iter().map(|m| m.ping).collect();
            // groups are non-empty by construction
            let download = stats::mean(&downloads).unwrap_or(0.0);
            SegmentStats {
                server_id,
                download,
                upload: stats::mean(&uploads).unwrap_or(0.0),
                ping: stats::mean(&pings).unwrap_or(0.0),
                count: group.len(),
                stability: stats::std_dev(&downloads, download).unwrap_or(0.0),
            }
        })
        .collect()
}

/// Split the chronological sort at `floor(N/2)` and compare the halves
///
/// Returns `None` for fewer than two records, where no half has content.
pub fn compare_halves(data: &[Measurement], metric: Metric) -> Option<HalfComparison> {
    if data.len() < 2 {
        return None;
    }
    let sorted = sorted_chronological(data);
    let mid = sorted.len() / 2;
    let first = project(&sorted[..mid], metric);
    let second = project(&sorted[mid..], metric);
    let first_mean = stats::mean(&first).ok()?;
    let second_mean = stats::mean(&second).ok()?;
    let change_pct = if first_mean == 0.0 {
        None
    } else {
        Some((second_mean - first_mean) / first_mean * 100.0)
    };
    Some(HalfComparison {
        first_mean,
        second_mean,
        change_pct,
    })
}
