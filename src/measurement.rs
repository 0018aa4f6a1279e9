//! Measurement records and their numeric projections
//!
//! A `Measurement` is one speed-test run as stored in the history file. The
//! engine treats the loaded collection as immutable; helpers here produce the
//! two ordering conventions in use (newest-first for table consumers,
//! chronological ascending for every temporal computation) as explicit copies
//! rather than relying on ambient array order.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One speed-test record
///
/// Field names match the historical JSON exactly (`serverId` on the wire).
/// `created` carries its own UTC offset; the record's local hour and weekday
/// for temporal bucketing come from that offset, keeping bucketing
/// deterministic regardless of the host timezone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: i64,
    pub created: DateTime<FixedOffset>,
    /// Download speed in Mbps
    pub download: f64,
    /// Upload speed in Mbps
    pub upload: f64,
    /// Latency in milliseconds
    pub ping: f64,
    /// Test duration in seconds
    pub time: f64,
    #[serde(rename = "serverId")]
    pub server_id: i64,
}

/// Numeric projection of a measurement set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Download,
    Upload,
    Ping,
}

impl Metric {
    /// All projections, in display order
    pub const ALL: [Metric; 3] = [Metric::Download, Metric::Upload, Metric::Ping];

    pub fn value(&self, m: &Measurement) -> f64 {
        match self {
            Metric::Download => m.download,
            Metric::Upload => m.upload,
            Metric::Ping => m.ping,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Download => "Download",
            Metric::Upload => "Upload",
            Metric::Ping => "Ping",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Download | Metric::Upload => "Mbps",
            Metric::Ping => "ms",
        }
    }
}

/// Project one metric out of a measurement slice, preserving order
pub fn project(data: &[Measurement], metric: Metric) -> Vec<f64> {
    data.iter().map(|m| metric.value(m)).collect()
}

/// Copy sorted ascending by `created` (oldest first)
pub fn sorted_chronological(data: &[Measurement]) -> Vec<Measurement> {
    let mut sorted = data.to_vec();
    sorted.sort_by_key(|m| m.created);
    sorted
}

/// Sort in place, newest first — the canonical storage order of the loaded
/// dataset
pub fn sort_newest_first(data: &mut [Measurement]) {
    data.sort_by(|a, b| b.created.cmp(&a.created));
}

/// Sorted distinct server ids of a dataset
pub fn server_inventory(data: &[Measurement]) -> Vec<i64> {
    let mut servers: Vec<i64> = data.iter().map(|m| m.server_id).collect();
    servers.sort_unstable();
    servers.dedup();
    servers
}

/// Stride-sample down to at most `max_points` records, keeping relative order
///
/// `step = ceil(N / max_points)`, take every step-th record. Used to thin
/// chart payloads; statistics always run over the full set.
pub fn reduce_points(data: &[Measurement], max_points: usize) -> Vec<Measurement> {
    if max_points == 0 || data.len() <= max_points {
        return data.to_vec();
    }
    let step = data.len().div_ceil(max_points);
    data.iter().step_by(step).cloned().collect()
}
