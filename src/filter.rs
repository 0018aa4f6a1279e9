//! Conjunctive filters over the full measurement set
//!
//! Filters always run against the complete loaded dataset, never against a
//! previously narrowed one, and an unset filter is a no-op. The recency
//! cutoff takes an explicit `now` so that the same parameters over the same
//! dataset always produce the same working set.

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::measurement::Measurement;

/// Filter parameters; every field `None` keeps all records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Keep records with `created >= now − period_days`
    pub period_days: Option<i64>,
    /// Keep records from exactly this server
    pub server_id: Option<i64>,
    /// Keep records with at least this download speed (Mbps)
    pub min_download: Option<f64>,
    /// Keep records with at least this upload speed (Mbps)
    pub min_upload: Option<f64>,
}

impl FilterParams {
    /// True when no filter is set and `apply` would copy the input unchanged
    pub fn is_noop(&self) -> bool {
        self.period_days.is_none()
            && self.server_id.is_none()
            && self.min_download.is_none()
            && self.min_upload.is_none()
    }

    /// Derive the working set, preserving the input's relative order
    pub fn apply(&self, data: &[Measurement], now: DateTime<FixedOffset>) -> Vec<Measurement> {
        let cutoff = self.period_days.map(|days| now - Duration::days(days));
        let kept: Vec<Measurement> = data
            .iter()
            .filter(|m| cutoff.is_none_or(|c| m.created >= c))
            .filter(|m| self.server_id.is_none_or(|id| m.server_id == id))
            .filter(|m| self.min_download.is_none_or(|min| m.download >= min))
            .filter(|m| self.min_upload.is_none_or(|min| m.upload >= min))
            .cloned()
            .collect();
        tracing::debug!(total = data.len(), kept = kept.len(), "applied filters");
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, day, 12, 0, 0)
            .unwrap()
    }

    fn record(day: u32, download: f64, upload: f64, server_id: i64) -> Measurement {
        Measurement {
            id: day as i64,
            created: at(day),
            download,
            upload,
            ping: 10.0,
            time: 30.0,
            server_id,
        }
    }

    #[test]
    fn test_default_filter_is_noop() {
        let params = FilterParams::default();
        assert!(params.is_noop());
        let data = vec![record(1, 10.0, 5.0, 1), record(2, 20.0, 10.0, 2)];
        assert_eq!(params.apply(&data, at(30)), data);
    }

    #[test]
    fn test_min_download_keeps_order() {
        let data = vec![
            record(1, 10.0, 5.0, 1),
            record(2, 60.0, 5.0, 1),
            record(3, 90.0, 5.0, 1),
        ];
        let params = FilterParams {
            min_download: Some(50.0),
            ..FilterParams::default()
        };
        let kept = params.apply(&data, at(30));
        let downloads: Vec<f64> = kept.iter().map(|m| m.download).collect();
        assert_eq!(downloads, vec![60.0, 90.0]);
    }

    #[test]
    fn test_min_download_is_inclusive() {
        let data = vec![record(1, 50.0, 5.0, 1)];
        let params = FilterParams {
            min_download: Some(50.0),
            ..FilterParams::default()
        };
        assert_eq!(params.apply(&data, at(30)).len(), 1);
    }

    #[test]
    fn test_server_filter_exact_match() {
        let data = vec![record(1, 10.0, 5.0, 7), record(2, 10.0, 5.0, 8)];
        let params = FilterParams {
            server_id: Some(8),
            ..FilterParams::default()
        };
        let kept = params.apply(&data, at(30));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].server_id, 8);
    }

    #[test]
    fn test_period_cutoff() {
        let data = vec![record(1, 10.0, 5.0, 1), record(20, 10.0, 5.0, 1)];
        let params = FilterParams {
            period_days: Some(15),
            ..FilterParams::default()
        };
        let kept = params.apply(&data, at(30));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 20);
    }

    #[test]
    fn test_filters_compose_conjunctively() {
        let data = vec![
            record(20, 100.0, 60.0, 1),
            record(21, 100.0, 10.0, 1), // fails upload
            record(22, 100.0, 60.0, 2), // fails server
            record(2, 100.0, 60.0, 1),  // fails period
        ];
        let params = FilterParams {
            period_days: Some(15),
            server_id: Some(1),
            min_download: Some(50.0),
            min_upload: Some(50.0),
        };
        let kept = params.apply(&data, at(30));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 20);
    }

    #[test]
    fn test_unset_filters_exclude_nothing() {
        let data = vec![record(1, 0.0, 0.0, 999)];
        let params = FilterParams {
            period_days: None,
            server_id: None,
            min_download: None,
            min_upload: None,
        };
        assert_eq!(params.apply(&data, at(30)).len(), 1);
    }
}
