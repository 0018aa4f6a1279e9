//! JSON rendering of an [`AnalysisReport`]
//!
//! The report serializes with serde; this module only owns the formatting
//! decision (pretty, trailing newline) so text and JSON callers read the
//! same way in `main`.

use anyhow::{Context, Result};

use crate::report::AnalysisReport;

/// Render the full report as pretty-printed JSON with a trailing newline
pub fn render_json(report: &AnalysisReport) -> Result<String> {
    let mut out =
        serde_json::to_string_pretty(report).context("failed to serialize analysis report")?;
    out.push('\n');
    Ok(out)
}
