//! Temporal aggregation: calendar buckets, rolling windows, and trend fitting
//!
//! Two different windowing schemes coexist here on purpose. `rolling_windows`
//! advances by the window size (non-overlapping consecutive slices, nothing
//! emitted for a partial tail), while `moving_average` grows a left window
//! `[max(0, i−w), i]` for every position — the historical trend charts use
//! the latter and the stability charts the former. Every function sorts its
//! own chronological copy; callers never need to pre-sort.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::measurement::{project, sorted_chronological, Measurement, Metric};
use crate::stats::{self, StatsError};

/// Mean download/upload/ping for one hour of the day (0–23)
///
/// Empty buckets report 0, not NaN — an hour with no tests renders as a zero
/// bar, matching the historical charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourBucket {
    pub hour: u32,
    pub count: usize,
    pub download: f64,
    pub upload: f64,
    pub ping: f64,
}

/// Mean download/upload/ping for one weekday (0=Sunday .. 6=Saturday)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekdayBucket {
    pub weekday: u32,
    pub count: usize,
    pub download: f64,
    pub upload: f64,
    pub ping: f64,
}

/// Mean download/upload/ping for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    /// 1–12
    pub month: u32,
    pub count: usize,
    pub download: f64,
    pub upload: f64,
    pub ping: f64,
}

/// The four fixed half-open day periods of the historical dashboard
///
/// Serialized under their original export labels, which downstream consumers
/// treat as data keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPeriod {
    /// [0, 6)
    #[serde(rename = "Madrugada")]
    EarlyMorning,
    /// [6, 12)
    #[serde(rename = "Manhã")]
    Morning,
    /// [12, 18)
    #[serde(rename = "Tarde")]
    Afternoon,
    /// [18, 24)
    #[serde(rename = "Noite")]
    Evening,
}

impl DayPeriod {
    pub const ALL: [DayPeriod; 4] = [
        DayPeriod::EarlyMorning,
        DayPeriod::Morning,
        DayPeriod::Afternoon,
        DayPeriod::Evening,
    ];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => DayPeriod::EarlyMorning,
            6..=11 => DayPeriod::Morning,
            12..=17 => DayPeriod::Afternoon,
            _ => DayPeriod::Evening,
        }
    }

    /// Export label (kept verbatim from the historical reports)
    pub fn label(&self) -> &'static str {
        match self {
            DayPeriod::EarlyMorning => "Madrugada",
            DayPeriod::Morning => "Manhã",
            DayPeriod::Afternoon => "Tarde",
            DayPeriod::Evening => "Noite",
        }
    }
}

/// Per-period means; `None` is the explicit N/A sentinel for an empty period,
/// distinct from a measured zero
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub period: DayPeriod,
    pub count: usize,
    pub download: Option<f64>,
    pub upload: Option<f64>,
    pub ping: Option<f64>,
}

/// One non-overlapping rolling window, anchored at its last timestamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingPoint {
    pub anchor: DateTime<FixedOffset>,
    pub mean: f64,
    pub std_dev: f64,
    /// Coefficient of variation (%); `None` when the window mean is zero
    pub cv: Option<f64>,
    /// Stability index `max(0, 100 − cv)`; `None` when CV is undefined
    pub stability: Option<f64>,
}

/// One point of the growing-left-window moving average
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub anchor: DateTime<FixedOffset>,
    pub value: f64,
}

/// Ordinary least-squares line over positional index (0..N−1 after
/// chronological sort)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn value_at(&self, index: usize) -> f64 {
        self.intercept + self.slope * index as f64
    }
}

fn mean_or_zero(values: &[f64]) -> f64 {
    stats::mean(values).unwrap_or(0.0)
}

/// Partition by the record's local hour; always 24 buckets
pub fn hourly_profile(data: &[Measurement]) -> Vec<HourBucket> {
    let mut groups: [Vec<&Measurement>; 24] = std::array::from_fn(|_| Vec::new());
    for m in data {
        groups[m.created.hour() as usize].push(m);
    }
    groups
        .iter()
        .enumerate()
        .map(|(hour, group)| HourBucket {
            hour: hour as u32,
            count: group.len(),
            download: mean_or_zero(&group.iter().map(|m| m.download).collect::<Vec<_>>()),
            upload: mean_or_zero(&group.iter().map(|m| m.upload).collect::<Vec<_>>()),
            ping: mean_or_zero(&group.iter().map(|m| m.ping).collect::<Vec<_>>()),
        })
        .collect()
}

/// Partition by weekday (0=Sunday .. 6=Saturday); always 7 buckets
pub fn weekday_profile(data: &[Measurement]) -> Vec<WeekdayBucket> {
    let mut groups: [Vec<&Measurement>; 7] = std::array::from_fn(|_| Vec::new());
    for m in data {
        groups[m.created.weekday().num_days_from_sunday() as usize].push(m);
    }
    groups
        .iter()
        .enumerate()
        .map(|(weekday, group)| WeekdayBucket {
            weekday: weekday as u32,
            count: group.len(),
            download: mean_or_zero(&group.iter().map(|m| m.download).collect::<Vec<_>>()),
            upload: mean_or_zero(&group.iter().map(|m| m.upload).collect::<Vec<_>>()),
            ping: mean_or_zero(&group.iter().map(|m| m.ping).collect::<Vec<_>>()),
        })
        .collect()
}

/// Partition by (year, month) in ascending chronological order
///
/// Every emitted bucket is non-empty by construction, so the means are always
/// defined.
pub fn monthly_profile(data: &[Measurement]) -> Vec<MonthBucket> {
    let mut groups: std::collections::BTreeMap<(i32, u32), Vec<&Measurement>> =
        std::collections::BTreeMap::new();
    for m in data {
        groups
            .entry((m.created.year(), m.created.month()))
            .or_default()
            .push(m);
    }
    groups
        .into_iter()
        .map(|((year, month), group)| MonthBucket {
            year,
            month,
            count: group.len(),
            download: mean_or_zero(&group.iter().map(|m| m.download).collect::<Vec<_>>()),
            upload: mean_or_zero(&group.iter().map(|m| m.upload).collect::<Vec<_>>()),
            ping: mean_or_zero(&group.iter().map(|m| m.ping).collect::<Vec<_>>()),
        })
        .collect()
}

/// Per-period means over the four fixed day periods, in declaration order
pub fn day_period_profile(data: &[Measurement]) -> Vec<PeriodStats> {
    DayPeriod::ALL
        .iter()
        .map(|&period| {
            let group: Vec<&Measurement> = data
                .iter()
                .filter(|m| DayPeriod::from_hour(m.created.hour()) == period)
                .collect();
            let mean_of = |f: fn(&Measurement) -> f64| {
                stats::mean(&group.iter().map(|m| f(m)).collect::<Vec<_>>()).ok()
            };
            PeriodStats {
                period,
                count: group.len(),
                download: mean_of(|m| m.download),
                upload: mean_of(|m| m.upload),
                ping: mean_of(|m| m.ping),
            }
        })
        .collect()
}

/// Adaptive window size for a chart over `n` points: `max(10, n / divisor)`
pub fn adaptive_window(n: usize, divisor: usize) -> usize {
    if divisor == 0 {
        return 10;
    }
    (n / divisor).max(10)
}

/// Non-overlapping rolling statistics over a chronological sort of `data`
///
/// Windows of size `window` advance by `window` starting at index `window`;
/// a sequence shorter than the window yields no points (no partial window is
/// emitted). Each point is anchored at its window's last timestamp.
pub fn rolling_windows(data: &[Measurement], metric: Metric, window: usize) -> Vec<RollingPoint> {
    if window == 0 {
        return Vec::new();
    }
    let sorted = sorted_chronological(data);
    let mut points = Vec::new();
    let mut end = window;
    while end <= sorted.len() {
        let slice = &sorted[end - window..end];
        let values = project(slice, metric);
        // window is non-empty here, mean/std cannot fail
        let mean = mean_or_zero(&values);
        let std_dev = stats::std_dev(&values, mean).unwrap_or(0.0);
        let cv = stats::coefficient_of_variation(std_dev, mean).ok();
        points.push(RollingPoint {
            anchor: slice[window - 1].created,
            mean,
            std_dev,
            cv,
            stability: cv.map(|c| (100.0 - c).max(0.0)),
        });
        end += window;
    }
    tracing::debug!(
        metric = metric.label(),
        window,
        points = points.len(),
        "computed rolling windows"
    );
    points
}

/// Growing-left-window moving average: position `i` averages
/// `[max(0, i − window), i]` of the chronological sort
pub fn moving_average(data: &[Measurement], metric: Metric, window: usize) -> Vec<TrendPoint> {
    let sorted = sorted_chronological(data);
    (0..sorted.len())
        .map(|i| {
            let start = i.saturating_sub(window);
            let values = project(&sorted[start..=i], metric);
            TrendPoint {
                anchor: sorted[i].created,
                value: mean_or_zero(&values),
            }
        })
        .collect()
}

/// OLS regression of a sequence against its positional index
pub fn linear_trend(values: &[f64]) -> Result<TrendLine, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let x_mean = (values.len() - 1) as f64 / 2.0;
    let y_mean = stats::mean(values)?;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }
    if sxx == 0.0 {
        // single point: no slope can be fitted
        return Err(StatsError::ZeroDenominator("trend slope"));
    }
    let slope = sxy / sxx;
    Ok(TrendLine {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

/// Fitted degradation trend for one metric over the chronological sort
pub fn trend_line(data: &[Measurement], metric: Metric) -> Result<TrendLine, StatsError> {
    let sorted = sorted_chronological(data);
    linear_trend(&project(&sorted, metric))
}
