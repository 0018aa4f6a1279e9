//! Velograph — statistical analysis of speed-test measurement histories
//!
//! The library takes a collection of speed-test records (download/upload
//! speed, latency, duration, server) and derives descriptive statistics,
//! outlier and distribution-shape analysis, temporal aggregations, per-server
//! segmentation, quality scores, and rule-based alerts. All computation is
//! pure and synchronous: an [`report::AnalysisReport`] is a deterministic
//! function of the filtered working set and the [`config::AnalysisConfig`].
//!
//! # Example
//!
//! ```
//! use velograph::config::AnalysisConfig;
//! use velograph::measurement::Measurement;
//! use velograph::report::AnalysisReport;
//!
//! let json = r#"[{
//!     "id": 1,
//!     "created": "2024-03-01T08:30:00-03:00",
//!     "download": 250.5,
//!     "upload": 120.2,
//!     "ping": 8.0,
//!     "time": 35.1,
//!     "serverId": 4404
//! }]"#;
//! let data: Vec<Measurement> = serde_json::from_str(json)?;
//! let report = AnalysisReport::build(&data, &AnalysisConfig::default())?;
//! assert_eq!(report.header.total_tests, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod alerts;
pub mod cli;
pub mod config;
pub mod filter;
pub mod json_output;
pub mod measurement;
pub mod outliers;
pub mod quality;
pub mod report;
pub mod segments;
pub mod stats;
pub mod temporal;
pub mod text_output;
