//! Core statistics over numeric projections of measurement sets
//!
//! Every function here is pure: it takes an explicit slice, works on a sorted
//! copy where ordering matters, and never mutates its input. All moment-based
//! statistics use the population form (divide by N, no bias correction) and
//! the percentile estimator is nearest-rank — both are compatibility
//! requirements for the historical dashboard exports, not oversights.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the core statistics functions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// A statistic was requested over zero values
    #[error("cannot compute statistics over an empty sequence")]
    EmptyInput,

    /// A ratio was requested with a zero denominator (e.g. CV with mean 0)
    #[error("undefined result: {0} has a zero denominator")]
    ZeroDenominator(&'static str),
}

/// Five-number summary of a numeric sequence
///
/// `q1` and `q3` use the floor-index rule (`sorted[floor(0.25·N)]` /
/// `sorted[floor(0.75·N)]`) rather than interpolation. This intentionally
/// simple estimator matches the historical output; do not substitute an
/// interpolating method without flagging the behavior change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub min: f64,
    pub max: f64,
}

impl Quartiles {
    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median: mean of the two central elements for even length, central element
/// for odd length
pub fn median(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let sorted = sorted_copy(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Population variance (divide by N) around a caller-supplied mean
pub fn variance(values: &[f64], mean: f64) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Ok(sum_sq / values.len() as f64)
}

/// Population standard deviation
pub fn std_dev(values: &[f64], mean: f64) -> Result<f64, StatsError> {
    variance(values, mean).map(f64::sqrt)
}

/// Five-number summary using the floor-index quartile rule
pub fn quartiles(values: &[f64]) -> Result<Quartiles, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let sorted = sorted_copy(values);
    let n = sorted.len();
    let q1_index = (n as f64 * 0.25).floor() as usize;
    let q3_index = (n as f64 * 0.75).floor() as usize;
    Ok(Quartiles {
        q1: sorted[q1_index.min(n - 1)],
        median: median(&sorted)?,
        q3: sorted[q3_index.min(n - 1)],
        min: sorted[0],
        max: sorted[n - 1],
    })
}

/// Nearest-rank percentile: `index = ceil(p/100 · N) − 1`, clamped to a valid
/// index
///
/// Selects an existing element, never interpolates. At p=50 this legitimately
/// diverges from [`median`] on even-length input (`[1,2,3,4]` → median 2.5,
/// percentile 2).
pub fn percentile(values: &[f64], p: f64) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let sorted = sorted_copy(values);
    let n = sorted.len();
    let rank = ((p / 100.0) * n as f64).ceil() as i64 - 1;
    let index = rank.clamp(0, n as i64 - 1) as usize;
    Ok(sorted[index])
}

/// Third standardized moment, population form
pub fn skewness(values: &[f64], mean: f64, std_dev: f64) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    if std_dev == 0.0 {
        return Err(StatsError::ZeroDenominator("skewness"));
    }
    let sum: f64 = values.iter().map(|v| ((v - mean) / std_dev).powi(3)).sum();
    Ok(sum / values.len() as f64)
}

/// Excess kurtosis (fourth standardized moment minus 3), population form
pub fn kurtosis(values: &[f64], mean: f64, std_dev: f64) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    if std_dev == 0.0 {
        return Err(StatsError::ZeroDenominator("kurtosis"));
    }
    let sum: f64 = values.iter().map(|v| ((v - mean) / std_dev).powi(4)).sum();
    Ok(sum / values.len() as f64 - 3.0)
}

/// Coefficient of variation as a percentage (`std/mean · 100`)
///
/// A zero mean is an explicit undefined result, never `Infinity`/`NaN`.
pub fn coefficient_of_variation(std_dev: f64, mean: f64) -> Result<f64, StatsError> {
    if mean == 0.0 {
        return Err(StatsError::ZeroDenominator("coefficient of variation"));
    }
    Ok(std_dev / mean * 100.0)
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}
