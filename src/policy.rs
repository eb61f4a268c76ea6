//! Release policy constants and exit thresholds.
//!
//! Several "metrics" in the report are fixed formulas rather than measurements
//! of the defect log (defect rate normalization, retest share). They live here
//! as named constants so that correcting them touches one place.

use serde::{Deserialize, Serialize};

/// Denominator used by the defect rate (defects per 1000, expressed as percent).
pub const DEFECT_RATE_NORMALIZATION: f64 = 1000.0;

/// Share of defects assumed to need a retest.
pub const RETEST_FRACTION: f64 = 0.25;

/// Look-back for the stability index, in days before the latest record.
pub const STABILITY_LOOKBACK_DAYS: i64 = 5;

/// Number of trailing days of the new-defect series the trend classifier reads.
pub const TREND_CLASSIFICATION_DAYS: usize = 3;

/// Default trend window, in calendar days.
pub const DEFAULT_TREND_WINDOW_DAYS: u32 = 5;

/// Longest trend window a run configuration may request, in calendar days.
pub const MAX_TREND_WINDOW_DAYS: u32 = 366;

/// Number of exit criteria evaluated for a release.
pub const EXIT_CRITERIA_COUNT: u32 = 8;

/// Uniform range of the simulated per-defect resolution time, in days.
pub const SIMULATED_RESOLUTION_DAYS: (f64, f64) = (1.0, 7.0);

/// Banded stability score for the number of recent "new" defects.
///
/// 0 → 100, 1-2 → 80, 3-5 → 60, 6-10 → 40, more → 20.
pub fn stability_score(recent_new: usize) -> u32 {
    match recent_new {
        0 => 100,
        1..=2 => 80,
        3..=5 => 60,
        6..=10 => 40,
        _ => 20,
    }
}

/// Exit thresholds for release approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitPolicy {
    /// Criterion 1: coverage percentage floor
    pub min_coverage: f64,
    /// Criterion 2: resolution rate floor
    pub min_resolution_rate: f64,
    /// Criterion 4: open high-severity defects allowed
    pub max_open_high: usize,
    /// Criterion 5: average resolution time ceiling, in days
    pub max_average_resolution_days: f64,
    /// Criterion 6: testing efficiency floor
    pub min_testing_efficiency: f64,
    /// Criterion 7: stability index floor
    pub min_stability_index: f64,
    /// Passing criteria required for approval
    pub required_passes: u32,
}

impl Default for ExitPolicy {
    fn default() -> Self {
        ExitPolicy {
            min_coverage: 90.0,
            min_resolution_rate: 85.0,
            max_open_high: 2,
            max_average_resolution_days: 5.0,
            min_testing_efficiency: 80.0,
            min_stability_index: 70.0,
            required_passes: 6,
        }
    }
}

impl ExitPolicy {
    /// Threshold pairs drawn as the traffic-light chart: (name, floor).
    pub fn traffic_light_floors(&self) -> [(&'static str, f64); 4] {
        [
            ("Coverage", self.min_coverage),
            ("Resolution", self.min_resolution_rate),
            ("Efficiency", self.min_testing_efficiency),
            ("Stability", self.min_stability_index),
        ]
    }
}
