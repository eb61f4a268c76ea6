//! Resolution-time sources.
//!
//! Defect logs without a `resolved_date` column cannot yield a real
//! resolution time. The simulated source stands in for it with one uniform
//! draw per resolved defect, from a seeded generator so that two runs over the
//! same log agree. Every use of the simulated source is logged as a warning.

use crate::policy::SIMULATED_RESOLUTION_DAYS;
use crate::store::DefectCollection;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Seed used when the configuration does not name one.
pub const DEFAULT_RESOLUTION_SEED: u64 = 42;

/// Requested resolution-time behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTimeMode {
    /// Recorded when any resolved defect carries a resolved date, else simulated
    #[default]
    Auto,
    Recorded,
    Simulated,
}

impl fmt::Display for ResolutionTimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionTimeMode::Auto => write!(f, "auto"),
            ResolutionTimeMode::Recorded => write!(f, "recorded"),
            ResolutionTimeMode::Simulated => write!(f, "simulated"),
        }
    }
}

impl FromStr for ResolutionTimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ResolutionTimeMode::Auto),
            "recorded" => Ok(ResolutionTimeMode::Recorded),
            "simulated" => Ok(ResolutionTimeMode::Simulated),
            _ => Err(format!("Unknown resolution time mode: {}", s)),
        }
    }
}

/// Concrete source chosen for one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionTimeSource {
    Recorded,
    Simulated { seed: u64 },
}

impl ResolutionTimeSource {
    /// Resolve `mode` against the data actually present in `defects`.
    pub fn select(mode: ResolutionTimeMode, seed: u64, defects: &DefectCollection) -> Self {
        match mode {
            ResolutionTimeMode::Recorded => ResolutionTimeSource::Recorded,
            ResolutionTimeMode::Simulated => ResolutionTimeSource::Simulated { seed },
            ResolutionTimeMode::Auto => {
                let has_recorded = defects
                    .iter()
                    .any(|r| r.status.is_resolved() && r.resolved_date.is_some());
                if has_recorded {
                    ResolutionTimeSource::Recorded
                } else {
                    ResolutionTimeSource::Simulated { seed }
                }
            }
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, ResolutionTimeSource::Simulated { .. })
    }

    /// Mean resolution days, `None` when there is nothing to average.
    pub fn average_days(&self, defects: &DefectCollection) -> Option<f64> {
        match self {
            ResolutionTimeSource::Recorded => recorded_mean(defects),
            ResolutionTimeSource::Simulated { seed } => {
                let resolved = defects.count_where(|r| r.status.is_resolved());
                let mean = simulated_mean(resolved, *seed);
                if mean.is_some() {
                    log::warn!(
                        "[Metrics] Average resolution time is SIMULATED ({} uniform draws, seed {}); the log has no resolved dates",
                        resolved,
                        seed
                    );
                }
                mean
            }
        }
    }
}

/// Mean of `resolved_date - date` over resolved defects that record it.
pub fn recorded_mean(defects: &DefectCollection) -> Option<f64> {
    let durations: Vec<f64> = defects
        .iter()
        .filter(|r| r.status.is_resolved())
        .filter_map(|r| r.resolution_days())
        .filter(|days| {
            if *days < 0.0 {
                log::warn!("[Metrics] Ignoring negative resolution time of {:.2} days", days);
            }
            *days >= 0.0
        })
        .collect();

    if durations.is_empty() {
        log::debug!("[Metrics] No resolved defect carries a resolved date");
        return None;
    }
    Some(durations.iter().sum::<f64>() / durations.len() as f64)
}

/// Mean of `count` seeded uniform draws over the simulated range.
pub fn simulated_mean(count: usize, seed: u64) -> Option<f64> {
    if count == 0 {
        return None;
    }
    let (low, high) = SIMULATED_RESOLUTION_DAYS;
    let mut rng = StdRng::seed_from_u64(seed);
    let total: f64 = (0..count).map(|_| rng.gen_range(low..high)).sum();
    Some(total / count as f64)
}
