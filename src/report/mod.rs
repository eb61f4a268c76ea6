//! Report artifacts for a metrics run.
//!
//! - `console`: dotted-leader text summary
//! - `charts`: inline SVG charts
//! - `html`: self-contained dashboard page
//!
//! The JSON summary (`metrics_summary.json`) carries the timestamp, the full
//! metric snapshot as plain numbers and strings, the trend series and the
//! exit-criteria detail.

pub mod charts;
pub mod console;
pub mod html;

pub use console::render_console;
pub use html::render_html;

use crate::error::ReportError;
use crate::exit_criteria::ExitCriteriaResult;
use crate::metrics::MetricsSnapshot;
use crate::models::TrendDay;
use crate::trend::TrendReport;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "metrics_summary.json";
pub const DASHBOARD_FILE: &str = "metrics_dashboard.html";

/// Exit-criteria block of the JSON summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitCriteriaSummary {
    pub passed: u32,
    pub total: u32,
    pub percentage: f64,
    pub overall_pass: bool,
    pub detail: BTreeMap<String, bool>,
}

impl From<&ExitCriteriaResult> for ExitCriteriaSummary {
    fn from(result: &ExitCriteriaResult) -> Self {
        ExitCriteriaSummary {
            passed: result.passed,
            total: result.total,
            percentage: result.percentage,
            overall_pass: result.overall_pass,
            detail: result.detail(),
        }
    }
}

/// Serialized per-run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub timestamp: DateTime<Local>,
    pub metrics: MetricsSnapshot,
    pub trend: Vec<TrendDay>,
    pub exit_criteria: ExitCriteriaSummary,
}

impl RunSummary {
    /// Summary stamped with the current local time
    pub fn new(metrics: MetricsSnapshot, trend: &TrendReport, result: &ExitCriteriaResult) -> Self {
        RunSummary {
            timestamp: Local::now(),
            metrics,
            trend: trend.days.clone(),
            exit_criteria: result.into(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Escape text for HTML and SVG content.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn write_artifact(path: &Path, content: &str) -> Result<(), ReportError> {
    let to_write_error = |source: std::io::Error| ReportError::Write {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(to_write_error)?;
        }
    }
    fs::write(path, content).map_err(to_write_error)
}

/// Write `metrics_summary.json` into `out_dir`.
pub fn write_summary(out_dir: &Path, summary: &RunSummary) -> Result<PathBuf, ReportError> {
    let path = out_dir.join(SUMMARY_FILE);
    write_artifact(&path, &summary.to_json_pretty()?)?;
    log::info!("[Report] JSON summary saved: {}", path.display());
    Ok(path)
}

/// Write `metrics_dashboard.html` into `out_dir`.
pub fn write_dashboard(out_dir: &Path, html: &str) -> Result<PathBuf, ReportError> {
    let path = out_dir.join(DASHBOARD_FILE);
    write_artifact(&path, html)?;
    log::info!("[Report] Dashboard generated: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup() {
        assert_eq!(
            escape_markup(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_markup("plain"), "plain");
    }

    #[test]
    fn test_write_artifact_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out");
        let path = write_dashboard(&out, "<html></html>").unwrap();
        assert_eq!(path, out.join(DASHBOARD_FILE));
        assert_eq!(fs::read_to_string(path).unwrap(), "<html></html>");
    }
}
