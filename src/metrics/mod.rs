//! Metrics engine: testing quality metrics computed from a defect log.
//!
//! ## Architecture
//! - **Measurement**: immutable result of one metric operation (key + value)
//! - **MetricsSnapshot**: ordered merge of measurements, the input to exit criteria
//! - **MetricsEngine**: owns the defect collection and exposes one operation per metric
//!
//! Every ratio guards its denominator. A guarded result is returned as a
//! *degenerate* measurement: its value reads as 0, but merging it leaves the
//! snapshot key absent, so the exit criteria fall back to their fail-closed
//! defaults instead of treating "no data" as a perfect score.

pub mod resolution;
pub mod snapshot;

pub use resolution::{ResolutionTimeMode, ResolutionTimeSource, DEFAULT_RESOLUTION_SEED};
pub use snapshot::MetricsSnapshot;

use crate::models::Status;
use crate::policy::{
    stability_score, DEFECT_RATE_NORMALIZATION, RETEST_FRACTION, STABILITY_LOOKBACK_DAYS,
};
use crate::store::DefectCollection;
use crate::trend::{TrendAnalyzer, TrendReport};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole * 100` rounded to two decimals, `None` for an empty whole.
pub fn percentage(part: f64, whole: f64) -> Option<f64> {
    if whole > 0.0 {
        Some(round2(part / whole * 100.0))
    } else {
        None
    }
}

/// Fixed snapshot keys, in computation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    Coverage,
    DefectRate,
    CriticalDensity,
    ResolutionRate,
    AverageResolutionDays,
    TestingEfficiency,
    RetestRate,
    StabilityIndex,
    DefectTrend,
}

impl MetricKey {
    pub const ALL: [MetricKey; 9] = [
        MetricKey::Coverage,
        MetricKey::DefectRate,
        MetricKey::CriticalDensity,
        MetricKey::ResolutionRate,
        MetricKey::AverageResolutionDays,
        MetricKey::TestingEfficiency,
        MetricKey::RetestRate,
        MetricKey::StabilityIndex,
        MetricKey::DefectTrend,
    ];

    /// Serialized key name
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::Coverage => "coverage",
            MetricKey::DefectRate => "defect_rate",
            MetricKey::CriticalDensity => "critical_density",
            MetricKey::ResolutionRate => "resolution_rate",
            MetricKey::AverageResolutionDays => "average_resolution_days",
            MetricKey::TestingEfficiency => "testing_efficiency",
            MetricKey::RetestRate => "retest_rate",
            MetricKey::StabilityIndex => "stability_index",
            MetricKey::DefectTrend => "defect_trend",
        }
    }

    /// Human-readable name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            MetricKey::Coverage => "Test coverage (%)",
            MetricKey::DefectRate => "Defect rate (%)",
            MetricKey::CriticalDensity => "Critical density (%)",
            MetricKey::ResolutionRate => "Resolution rate (%)",
            MetricKey::AverageResolutionDays => "Average resolution time (days)",
            MetricKey::TestingEfficiency => "Testing efficiency (%)",
            MetricKey::RetestRate => "Retest rate (%)",
            MetricKey::StabilityIndex => "Stability index",
            MetricKey::DefectTrend => "Defect trend",
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A metric value: plain number or label, serialized without wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Number(f64),
    Label(String),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Integer(v) => Some(*v as f64),
            MetricValue::Number(v) => Some(*v),
            MetricValue::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            MetricValue::Label(label) => Some(label),
            _ => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(v) => write!(f, "{}", v),
            MetricValue::Number(v) => write!(f, "{}", v),
            MetricValue::Label(label) => write!(f, "{}", label),
        }
    }
}

/// Result of a single metric operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub key: MetricKey,
    pub value: MetricValue,
    /// Produced by a zero-denominator guard; not recorded in a snapshot
    pub degenerate: bool,
}

impl Measurement {
    pub fn number(key: MetricKey, value: f64) -> Self {
        Measurement {
            key,
            value: MetricValue::Number(value),
            degenerate: false,
        }
    }

    pub fn integer(key: MetricKey, value: i64) -> Self {
        Measurement {
            key,
            value: MetricValue::Integer(value),
            degenerate: false,
        }
    }

    pub fn label(key: MetricKey, label: impl Into<String>) -> Self {
        Measurement {
            key,
            value: MetricValue::Label(label.into()),
            degenerate: false,
        }
    }

    /// Zero result of a guarded ratio.
    pub fn degenerate(key: MetricKey) -> Self {
        Measurement {
            key,
            value: MetricValue::Number(0.0),
            degenerate: true,
        }
    }

    fn from_ratio(key: MetricKey, ratio: Option<f64>) -> Self {
        match ratio {
            Some(value) => Measurement::number(key, value),
            None => {
                log::debug!("[Metrics] {} has an empty denominator, yielding 0", key);
                Measurement::degenerate(key)
            }
        }
    }

    /// Numeric reading; labels read as 0.
    pub fn as_f64(&self) -> f64 {
        self.value.as_f64().unwrap_or(0.0)
    }
}

/// Computes the fixed metric set over one defect collection.
pub struct MetricsEngine {
    defects: DefectCollection,
    resolution_source: ResolutionTimeSource,
}

impl MetricsEngine {
    /// Create an engine using the automatic resolution-time source and default seed
    pub fn new(defects: DefectCollection) -> Self {
        let resolution_source =
            ResolutionTimeSource::select(ResolutionTimeMode::Auto, DEFAULT_RESOLUTION_SEED, &defects);
        MetricsEngine {
            defects,
            resolution_source,
        }
    }

    /// Choose how the average resolution time is obtained
    pub fn with_resolution_mode(mut self, mode: ResolutionTimeMode, seed: u64) -> Self {
        self.resolution_source = ResolutionTimeSource::select(mode, seed, &self.defects);
        self
    }

    pub fn defects(&self) -> &DefectCollection {
        &self.defects
    }

    /// Release the defect collection once all metrics are computed
    pub fn into_defects(self) -> DefectCollection {
        self.defects
    }

    pub fn resolution_source(&self) -> ResolutionTimeSource {
        self.resolution_source
    }

    /// Executed test cases as a percentage of planned cases.
    pub fn coverage(&self, executed: u32, total: u32) -> Measurement {
        Measurement::from_ratio(
            MetricKey::Coverage,
            percentage(executed as f64, total as f64),
        )
    }

    /// Defect count against the fixed normalization constant.
    pub fn defect_rate(&self) -> Measurement {
        let rate = self.defects.len() as f64 / DEFECT_RATE_NORMALIZATION * 100.0;
        Measurement::number(MetricKey::DefectRate, round2(rate))
    }

    /// Share of critical and high severity defects.
    pub fn critical_density(&self) -> Measurement {
        let severe = self.defects.count_where(|r| r.severity.is_severe());
        Measurement::from_ratio(
            MetricKey::CriticalDensity,
            percentage(severe as f64, self.defects.len() as f64),
        )
    }

    /// Share of fixed and closed defects.
    pub fn resolution_rate(&self) -> Measurement {
        let resolved = self.defects.count_where(|r| r.status.is_resolved());
        Measurement::from_ratio(
            MetricKey::ResolutionRate,
            percentage(resolved as f64, self.defects.len() as f64),
        )
    }

    /// Mean days to resolution over resolved defects.
    pub fn average_resolution_time(&self) -> Measurement {
        let mean = self.resolution_source.average_days(&self.defects);
        Measurement::from_ratio(MetricKey::AverageResolutionDays, mean.map(round2))
    }

    /// Defects caught before production as a share of all defects found.
    pub fn testing_efficiency(&self, pre_production: u32, production: u32) -> Measurement {
        let found = pre_production as f64 + production as f64;
        Measurement::from_ratio(
            MetricKey::TestingEfficiency,
            percentage(pre_production as f64, found),
        )
    }

    /// Fixed retest share; not derived from retest data.
    pub fn retest_rate(&self) -> Measurement {
        if self.defects.is_empty() {
            return Measurement::degenerate(MetricKey::RetestRate);
        }
        Measurement::number(MetricKey::RetestRate, round2(RETEST_FRACTION * 100.0))
    }

    /// Banded score from the count of "new" defects near the latest date.
    pub fn stability_index(&self) -> Measurement {
        let recent_new = match self.defects.latest_date() {
            Some(latest) => {
                let cutoff = latest
                    .checked_sub_signed(chrono::Duration::days(STABILITY_LOOKBACK_DAYS))
                    .unwrap_or(chrono::NaiveDateTime::MIN);
                self.defects
                    .count_where(|r| r.date >= cutoff && r.status == Status::New)
            }
            None => 0,
        };
        Measurement::integer(MetricKey::StabilityIndex, stability_score(recent_new) as i64)
    }

    /// Daily new/closed/open series over the trailing window, and its direction.
    pub fn detect_trend(&self, window_days: u32) -> TrendReport {
        TrendAnalyzer::new(&self.defects).detect_trend(window_days)
    }

    /// Run every metric in the fixed order and merge the results.
    pub fn compute_all(
        &self,
        executed: u32,
        total: u32,
        pre_production: u32,
        production: u32,
    ) -> MetricsSnapshot {
        let snapshot = MetricsSnapshot::new()
            .with(self.coverage(executed, total))
            .with(self.defect_rate())
            .with(self.critical_density())
            .with(self.resolution_rate())
            .with(self.average_resolution_time())
            .with(self.testing_efficiency(pre_production, production))
            .with(self.retest_rate())
            .with(self.stability_index());

        log::info!(
            "[Metrics] Computed {} metrics over {} defects",
            snapshot.len(),
            self.defects.len()
        );
        snapshot
    }
}
