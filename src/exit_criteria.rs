//! Release exit criteria.
//!
//! Eight fixed criteria are evaluated against a metrics snapshot; criteria 3
//! and 4 also look at the defect log directly. A metric missing from the
//! snapshot takes a default chosen so that its criterion fails.

use crate::metrics::{percentage, MetricKey, MetricsSnapshot};
use crate::models::{Severity, TrendLabel};
use crate::policy::{ExitPolicy, EXIT_CRITERIA_COUNT};
use crate::store::DefectCollection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reading for an absent "must be high" metric.
pub const MISSING_FLOOR_METRIC: f64 = 0.0;
/// Reading for an absent average resolution time.
pub const MISSING_RESOLUTION_DAYS: f64 = 10.0;
/// Reading for an absent critical density.
pub const MISSING_CRITICAL_DENSITY: f64 = 100.0;

/// One evaluated criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionOutcome {
    /// 1-based position in the fixed criteria list
    pub number: u8,
    pub label: String,
    pub passed: bool,
}

/// All eight outcomes and the approval decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitCriteriaResult {
    pub criteria: Vec<CriterionOutcome>,
    pub passed: u32,
    pub total: u32,
    pub percentage: f64,
    pub overall_pass: bool,
}

impl ExitCriteriaResult {
    /// Label → pass flag. Labels carry their number, so iteration order is criterion order.
    pub fn detail(&self) -> BTreeMap<String, bool> {
        self.criteria
            .iter()
            .map(|c| (c.label.clone(), c.passed))
            .collect()
    }

    pub fn failed(&self) -> impl Iterator<Item = &CriterionOutcome> {
        self.criteria.iter().filter(|c| !c.passed)
    }
}

/// Evaluates snapshots against an exit policy.
#[derive(Debug, Clone, Default)]
pub struct ExitCriteriaEvaluator {
    policy: ExitPolicy,
}

impl ExitCriteriaEvaluator {
    pub fn new(policy: ExitPolicy) -> Self {
        ExitCriteriaEvaluator { policy }
    }

    pub fn policy(&self) -> &ExitPolicy {
        &self.policy
    }

    /// Evaluate the eight criteria.
    pub fn evaluate(&self, snapshot: &MetricsSnapshot, defects: &DefectCollection) -> ExitCriteriaResult {
        let policy = &self.policy;
        let floor = |key: MetricKey| snapshot.number(key).unwrap_or(MISSING_FLOOR_METRIC);

        let open_critical = defects.open_with_severity(&Severity::Critical);
        let open_high = defects.open_with_severity(&Severity::High);
        let critical_density = snapshot
            .number(MetricKey::CriticalDensity)
            .unwrap_or(MISSING_CRITICAL_DENSITY);
        let resolution_days = snapshot
            .number(MetricKey::AverageResolutionDays)
            .unwrap_or(MISSING_RESOLUTION_DAYS);
        let trend = snapshot
            .label(MetricKey::DefectTrend)
            .and_then(TrendLabel::from_label);

        let checks = [
            (
                format!("1. Test coverage >= {}%", policy.min_coverage),
                floor(MetricKey::Coverage) >= policy.min_coverage,
            ),
            (
                format!("2. Resolution rate >= {}%", policy.min_resolution_rate),
                floor(MetricKey::ResolutionRate) >= policy.min_resolution_rate,
            ),
            (
                "3. No open critical defects".to_string(),
                critical_density == 0.0 || open_critical == 0,
            ),
            (
                format!("4. Open high defects <= {}", policy.max_open_high),
                open_high <= policy.max_open_high,
            ),
            (
                format!(
                    "5. Average resolution time <= {} days",
                    policy.max_average_resolution_days
                ),
                resolution_days <= policy.max_average_resolution_days,
            ),
            (
                format!("6. Testing efficiency >= {}%", policy.min_testing_efficiency),
                floor(MetricKey::TestingEfficiency) >= policy.min_testing_efficiency,
            ),
            (
                format!("7. Stability index >= {}", policy.min_stability_index),
                floor(MetricKey::StabilityIndex) >= policy.min_stability_index,
            ),
            (
                "8. Defect trend descending".to_string(),
                trend == Some(TrendLabel::Descending),
            ),
        ];

        let criteria: Vec<CriterionOutcome> = checks
            .into_iter()
            .enumerate()
            .map(|(i, (label, passed))| CriterionOutcome {
                number: i as u8 + 1,
                label,
                passed,
            })
            .collect();

        let passed = criteria.iter().filter(|c| c.passed).count() as u32;
        let total = EXIT_CRITERIA_COUNT;
        let overall_pass = passed >= policy.required_passes;

        for outcome in criteria.iter().filter(|c| !c.passed) {
            log::debug!("[Exit] FAIL {}", outcome.label);
        }
        log::info!(
            "[Exit] {}/{} criteria met, release {}",
            passed,
            total,
            if overall_pass { "approved" } else { "not approved" }
        );

        ExitCriteriaResult {
            criteria,
            passed,
            total,
            percentage: percentage(passed as f64, total as f64).unwrap_or(0.0),
            overall_pass,
        }
    }
}
