//! Run orchestration: one sequential pass over a loaded defect log.
//!
//! Phases:
//! 1. Metrics (fixed order, merged into a snapshot)
//! 2. Trend (window series, label merged into the snapshot)
//! 3. Exit criteria
//! 4. Artifacts (JSON summary, optional HTML dashboard)

use crate::config::RunConfig;
use crate::error::{ReportError, Result};
use crate::exit_criteria::{ExitCriteriaEvaluator, ExitCriteriaResult};
use crate::metrics::{MetricsEngine, MetricsSnapshot, ResolutionTimeSource};
use crate::report::{render_html, write_dashboard, write_summary, RunSummary};
use crate::store::{load_csv, DefectCollection};
use crate::trend::TrendReport;
use std::path::{Path, PathBuf};

/// Everything computed by one run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub defects: DefectCollection,
    pub snapshot: MetricsSnapshot,
    pub trend: TrendReport,
    pub exit_criteria: ExitCriteriaResult,
    pub resolution_source: ResolutionTimeSource,
}

impl RunOutcome {
    pub fn summary(&self) -> RunSummary {
        RunSummary::new(self.snapshot.clone(), &self.trend, &self.exit_criteria)
    }
}

/// Paths of the written artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArtifacts {
    pub summary_path: PathBuf,
    pub dashboard_path: Option<PathBuf>,
}

/// Compute metrics, trend and exit criteria for `defects`.
pub fn evaluate(defects: DefectCollection, config: &RunConfig) -> RunOutcome {
    let engine = MetricsEngine::new(defects)
        .with_resolution_mode(config.resolution_time, config.resolution_seed);

    log::info!("[Pipeline] Computing metrics over {} defects", engine.defects().len());
    let metrics = engine.compute_all(
        config.executed_cases,
        config.total_cases,
        config.pre_production_defects,
        config.production_defects,
    );

    log::info!("[Pipeline] Analyzing trend ({} days)", config.trend_window_days);
    let trend = engine.detect_trend(config.trend_window_days);
    let snapshot = metrics.with(trend.measurement());

    log::info!("[Pipeline] Evaluating exit criteria");
    let exit_criteria =
        ExitCriteriaEvaluator::new(config.policy.clone()).evaluate(&snapshot, engine.defects());

    let resolution_source = engine.resolution_source();
    RunOutcome {
        defects: engine.into_defects(),
        snapshot,
        trend,
        exit_criteria,
        resolution_source,
    }
}

/// Write the JSON summary and, if enabled, the HTML dashboard.
pub fn write_artifacts(
    outcome: &RunOutcome,
    config: &RunConfig,
) -> std::result::Result<RunArtifacts, ReportError> {
    let summary = outcome.summary();
    let summary_path = write_summary(&config.output_dir, &summary)?;

    let dashboard_path = if config.html_report {
        let html = render_html(&summary, &outcome.defects, &config.policy);
        Some(write_dashboard(&config.output_dir, &html)?)
    } else {
        None
    };

    Ok(RunArtifacts {
        summary_path,
        dashboard_path,
    })
}

/// Load, evaluate and write artifacts.
pub fn run(defects_path: &Path, config: &RunConfig) -> Result<(RunOutcome, RunArtifacts)> {
    let defects = load_csv(defects_path)?;
    let outcome = evaluate(defects, config);
    let artifacts = write_artifacts(&outcome, config)?;
    Ok((outcome, artifacts))
}
