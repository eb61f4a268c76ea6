//! Run configuration.
//!
//! A `RunConfig` carries the run parameters the defect log cannot supply
//! (test-case counts, pre-production vs production defect counts), the trend
//! window, the resolution-time source and the exit policy.
//!
//! # Module Structure
//!
//! - `loader`: reads and writes configuration files (JSON or TOML)
//! - `validator`: rejects inconsistent settings
//!
//! # Configuration Flow
//!
//! 1. `RunConfig::default()` or a file loaded by `loader`
//! 2. Command line overrides applied by the binary
//! 3. `validator::validate_config` before any metric runs

pub mod loader;
pub mod validator;

use crate::metrics::{ResolutionTimeMode, DEFAULT_RESOLUTION_SEED};
use crate::policy::{ExitPolicy, DEFAULT_TREND_WINDOW_DAYS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Parameters and policy for one metrics run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Test cases executed
    pub executed_cases: u32,
    /// Test cases planned
    pub total_cases: u32,
    /// Defects found before production
    pub pre_production_defects: u32,
    /// Defects found in production
    pub production_defects: u32,
    /// Trailing days in the trend window
    pub trend_window_days: u32,
    pub resolution_time: ResolutionTimeMode,
    /// Seed for the simulated resolution-time source
    pub resolution_seed: u64,
    /// Directory receiving the JSON summary and HTML report
    pub output_dir: PathBuf,
    /// Write the HTML report in addition to the JSON summary
    pub html_report: bool,
    pub policy: ExitPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            executed_cases: 48,
            total_cases: 50,
            pre_production_defects: 19,
            production_defects: 1,
            trend_window_days: DEFAULT_TREND_WINDOW_DAYS,
            resolution_time: ResolutionTimeMode::Auto,
            resolution_seed: DEFAULT_RESOLUTION_SEED,
            output_dir: PathBuf::from("dashboards"),
            html_report: true,
            policy: ExitPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_parameters() {
        let config = RunConfig::default();
        assert_eq!(config.executed_cases, 48);
        assert_eq!(config.total_cases, 50);
        assert_eq!(config.pre_production_defects, 19);
        assert_eq!(config.production_defects, 1);
        assert_eq!(config.trend_window_days, 5);
        assert_eq!(config.resolution_time, ResolutionTimeMode::Auto);
        assert!(config.html_report);
    }

    #[test]
    fn test_sparse_json_keeps_defaults() {
        let config: RunConfig =
            serde_json::from_str(r#"{"trend_window_days": 7, "resolution_time": "simulated"}"#)
                .unwrap();
        assert_eq!(config.trend_window_days, 7);
        assert_eq!(config.resolution_time, ResolutionTimeMode::Simulated);
        assert_eq!(config.executed_cases, 48);
        assert_eq!(config.policy, ExitPolicy::default());
    }
}
