//! Property-based tests for the statistics pipeline
//!
//! Each block checks an invariant that must hold for arbitrary finite inputs:
//! ordering of the quartile summary, agreement between variance and standard
//! deviation, range containment of percentiles and moving averages, and the
//! subset/order guarantees of filtering and outlier detection.

use chrono::{DateTime, FixedOffset, TimeZone};
use proptest::prelude::*;
use velograph::config::AnalysisConfig;
use velograph::filter::FilterParams;
use velograph::measurement::{Measurement, Metric};
use velograph::outliers::detect_outliers;
use velograph::report::AnalysisReport;
use velograph::stats;
use velograph::temporal::moving_average;

fn at(minutes: i64) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .unwrap()
        + chrono::Duration::minutes(minutes)
}

fn set_from(values: &[f64]) -> Vec<Measurement> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| Measurement {
            id: i as i64,
            created: at(i as i64 * 90),
            download: v,
            upload: v / 2.0,
            ping: 10.0,
            time: 30.0,
            server_id: (i % 3) as i64,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_quartile_summary_is_ordered(values in prop::collection::vec(0.0f64..10_000.0, 1..200)) {
        let q = stats::quartiles(&values).unwrap();
        prop_assert!(q.min <= q.q1);
        prop_assert!(q.q1 <= q.median);
        prop_assert!(q.median <= q.q3);
        prop_assert!(q.q3 <= q.max);
    }

    #[test]
    fn prop_std_dev_squares_to_variance(values in prop::collection::vec(0.0f64..10_000.0, 1..200)) {
        let mean = stats::mean(&values).unwrap();
        let variance = stats::variance(&values, mean).unwrap();
        let std = stats::std_dev(&values, mean).unwrap();
        prop_assert!((std * std - variance).abs() <= variance.max(1.0) * 1e-9);
    }

    #[test]
    fn prop_mean_within_observed_range(values in prop::collection::vec(0.0f64..10_000.0, 1..200)) {
        let mean = stats::mean(&values).unwrap();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(mean >= min - 1e-9);
        prop_assert!(mean <= max + 1e-9);
    }

    #[test]
    fn prop_percentile_within_observed_range(
        values in prop::collection::vec(0.0f64..10_000.0, 1..200),
        p in 0.0f64..=100.0,
    ) {
        let v = stats::percentile(&values, p).unwrap();
        prop_assert!(values.contains(&v));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_outliers_are_a_sub_multiset(values in prop::collection::vec(0.0f64..10_000.0, 0..200)) {
        let outliers = detect_outliers(&values, 1.5);
        prop_assert!(outliers.len() <= values.len());
        for o in &outliers {
            prop_assert!(values.contains(o));
        }
    }

    #[test]
    fn prop_filter_keeps_a_prefix_free_subsequence(
        values in prop::collection::vec(0.0f64..1_000.0, 0..100),
        min_download in 0.0f64..1_000.0,
    ) {
        let data = set_from(&values);
        let params = FilterParams { min_download: Some(min_download), ..FilterParams::default() };
        let kept = params.apply(&data, at(1_000_000));
        prop_assert!(kept.len() <= data.len());
        // kept ids appear in the same relative order as the input
        let ids: Vec<i64> = kept.iter().map(|m| m.id).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(kept.iter().all(|m| m.download >= min_download));
    }

    #[test]
    fn prop_moving_average_stays_in_range(
        values in prop::collection::vec(0.0f64..10_000.0, 1..100),
        window in 1usize..30,
    ) {
        let data = set_from(&values);
        let points = moving_average(&data, Metric::Download, window);
        prop_assert_eq!(points.len(), values.len());
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for p in &points {
            prop_assert!(p.value >= min - 1e-9);
            prop_assert!(p.value <= max + 1e-9);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_report_builds_for_any_non_empty_set(
        values in prop::collection::vec(0.0f64..10_000.0, 1..60),
    ) {
        let data = set_from(&values);
        let report = AnalysisReport::build(&data, &AnalysisConfig::default()).unwrap();
        prop_assert_eq!(report.header.total_tests, values.len());
        prop_assert!(report.header.first_test <= report.header.last_test);
        prop_assert!(!report.alerts.is_empty());
        // outlier rates are percentages
        prop_assert!((0.0..=100.0).contains(&report.outliers.combined_rate_pct));
        if let Some(q) = report.quality {
            prop_assert!((0.0..=100.0).contains(&q.score));
        }
    }
}
