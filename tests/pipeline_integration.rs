//! End-to-end runs: CSV defect log -> metrics -> exit criteria -> artifacts
//!
//! Test Organization:
//! - Approved release (2 tests)
//! - Degenerate logs (2 tests)
//! - Load failures (3 tests)
//! - Artifacts (2 tests)

use defect_metrics::config::RunConfig;
use defect_metrics::error::{LoadError, MetricsError};
use defect_metrics::report::{self, RunSummary, DASHBOARD_FILE, SUMMARY_FILE};
use defect_metrics::{pipeline, MetricKey, ResolutionTimeMode, TrendLabel};
use std::fs;
use std::path::{Path, PathBuf};

/// Ten defects over five days: nine resolved two days after filing, one open
/// on the first day. Every criterion passes with the default policy.
const HEALTHY_LOG: &str = "\
id,date,severity,status,resolved_date
D-1,2024-03-01,high,closed,2024-03-03
D-2,2024-03-01,medium,fixed,2024-03-03
D-3,2024-03-02,low,closed,2024-03-04
D-4,2024-03-02,medium,closed,2024-03-04
D-5,2024-03-03,critical,fixed,2024-03-05
D-6,2024-03-03,low,closed,2024-03-05
D-7,2024-03-04,medium,fixed,2024-03-06
D-8,2024-03-04,low,closed,2024-03-06
D-9,2024-03-05,low,closed,2024-03-07
D-10,2024-03-01,medium,open,
";

fn write_log(dir: &Path, content: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.join("defects.csv");
    fs::write(&path, content)?;
    Ok(path)
}

fn config_for(out_dir: &Path) -> RunConfig {
    let mut config = RunConfig::default();
    config.output_dir = out_dir.join("dashboards");
    config
}

// ============================================================================
// APPROVED RELEASE TESTS (2 tests)
// ============================================================================

#[test]
fn test_healthy_log_is_approved() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::TempDir::new()?;
    let log_path = write_log(tempdir.path(), HEALTHY_LOG)?;
    let config = config_for(tempdir.path());

    let (outcome, _artifacts) = pipeline::run(&log_path, &config)?;
    let snapshot = &outcome.snapshot;

    assert_eq!(snapshot.number(MetricKey::Coverage), Some(96.0));
    assert_eq!(snapshot.number(MetricKey::DefectRate), Some(1.0));
    assert_eq!(snapshot.number(MetricKey::CriticalDensity), Some(20.0));
    assert_eq!(snapshot.number(MetricKey::ResolutionRate), Some(90.0));
    assert_eq!(snapshot.number(MetricKey::AverageResolutionDays), Some(2.0));
    assert_eq!(snapshot.number(MetricKey::TestingEfficiency), Some(95.0));
    assert_eq!(snapshot.number(MetricKey::RetestRate), Some(25.0));
    assert_eq!(snapshot.number(MetricKey::StabilityIndex), Some(100.0));
    assert_eq!(snapshot.label(MetricKey::DefectTrend), Some("descending"));

    assert!(!outcome.resolution_source.is_simulated());
    assert_eq!(outcome.exit_criteria.passed, 8);
    assert_eq!(outcome.exit_criteria.percentage, 100.0);
    assert!(outcome.exit_criteria.overall_pass);

    println!("✓ Healthy log approved with 8/8 criteria");
    Ok(())
}

#[test]
fn test_trend_window_covers_latest_days() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::TempDir::new()?;
    let log_path = write_log(tempdir.path(), HEALTHY_LOG)?;
    let config = config_for(tempdir.path());

    let (outcome, _) = pipeline::run(&log_path, &config)?;
    let days = &outcome.trend.days;

    assert_eq!(days.len(), 5);
    assert_eq!(days[0].day.to_string(), "2024-03-01");
    assert_eq!(days[4].day.to_string(), "2024-03-05");
    let new_counts: Vec<u32> = days.iter().map(|d| d.new_count).collect();
    let closed_counts: Vec<u32> = days.iter().map(|d| d.closed_count).collect();
    assert_eq!(new_counts, vec![1, 0, 0, 0, 0]);
    assert_eq!(closed_counts, vec![2, 2, 2, 2, 1]);
    assert!(days.iter().all(|d| d.cumulative_open == 0));
    assert_eq!(outcome.trend.label, TrendLabel::Descending);

    Ok(())
}

// ============================================================================
// DEGENERATE LOG TESTS (2 tests)
// ============================================================================

#[test]
fn test_header_only_log_fails_closed() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::TempDir::new()?;
    let log_path = write_log(tempdir.path(), "date,severity,status\n")?;
    let config = config_for(tempdir.path());

    let (outcome, _) = pipeline::run(&log_path, &config)?;
    let snapshot = &outcome.snapshot;

    assert_eq!(snapshot.number(MetricKey::DefectRate), Some(0.0));
    assert_eq!(snapshot.number(MetricKey::StabilityIndex), Some(100.0));
    assert!(!snapshot.contains(MetricKey::ResolutionRate));
    assert!(!snapshot.contains(MetricKey::AverageResolutionDays));
    assert_eq!(snapshot.label(MetricKey::DefectTrend), Some("insufficient data"));
    assert!(outcome.trend.days.is_empty());

    // Coverage, no open critical, open high, efficiency and stability pass
    assert_eq!(outcome.exit_criteria.passed, 5);
    assert!(!outcome.exit_criteria.overall_pass);
    Ok(())
}

#[test]
fn test_simulated_resolution_is_reproducible() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::TempDir::new()?;
    let log = "date,severity,status\n2024-03-01,low,closed\n2024-03-02,low,fixed\n2024-03-03,high,new\n";
    let log_path = write_log(tempdir.path(), log)?;

    let mut config = config_for(tempdir.path());
    config.resolution_time = ResolutionTimeMode::Auto;
    config.resolution_seed = 7;

    let (first, _) = pipeline::run(&log_path, &config)?;
    let (second, _) = pipeline::run(&log_path, &config)?;

    assert!(first.resolution_source.is_simulated());
    let days = first
        .snapshot
        .number(MetricKey::AverageResolutionDays)
        .ok_or("average resolution time missing")?;
    assert!((1.0..7.0).contains(&days), "simulated mean {}", days);
    assert_eq!(
        second.snapshot.number(MetricKey::AverageResolutionDays),
        Some(days)
    );
    Ok(())
}

// ============================================================================
// LOAD FAILURE TESTS (3 tests)
// ============================================================================

#[test]
fn test_missing_log_aborts_run() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::TempDir::new()?;
    let config = config_for(tempdir.path());

    match pipeline::run(&tempdir.path().join("absent.csv"), &config) {
        Err(MetricsError::Load(LoadError::FileNotFound(_))) => {}
        Err(e) => return Err(format!("Expected FileNotFound, got: {}", e).into()),
        Ok(_) => return Err("Expected the run to abort".into()),
    }
    assert!(!config.output_dir.exists(), "no artifacts on a failed load");
    Ok(())
}

#[test]
fn test_missing_status_column_aborts_run() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::TempDir::new()?;
    let log_path = write_log(tempdir.path(), "date,severity\n2024-03-01,low\n")?;
    let config = config_for(tempdir.path());

    match pipeline::run(&log_path, &config) {
        Err(MetricsError::Load(LoadError::MissingColumn(column))) => {
            assert_eq!(column, "status");
            Ok(())
        }
        Err(e) => Err(format!("Expected MissingColumn, got: {}", e).into()),
        Ok(_) => Err("Expected the run to abort".into()),
    }
}

#[test]
fn test_resolution_before_filing_aborts_run() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::TempDir::new()?;
    let log = "id,date,severity,status,resolved_date\n\
               D-1,2024-01-10,high,fixed,2024-01-01\n";
    let log_path = write_log(tempdir.path(), log)?;
    let config = config_for(tempdir.path());

    match pipeline::run(&log_path, &config) {
        Err(MetricsError::Load(LoadError::ResolvedBeforeFiled { line, id })) => {
            assert_eq!(line, 2);
            assert_eq!(id, "D-1");
        }
        Err(e) => return Err(format!("Expected ResolvedBeforeFiled, got: {}", e).into()),
        Ok(_) => return Err("Expected the run to abort".into()),
    }
    assert!(!config.output_dir.exists());
    Ok(())
}

// ============================================================================
// ARTIFACT TESTS (2 tests)
// ============================================================================

#[test]
fn test_summary_json_matches_snapshot() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::TempDir::new()?;
    let log_path = write_log(tempdir.path(), HEALTHY_LOG)?;
    let config = config_for(tempdir.path());

    let (outcome, artifacts) = pipeline::run(&log_path, &config)?;
    assert_eq!(artifacts.summary_path, config.output_dir.join(SUMMARY_FILE));

    let raw = fs::read_to_string(&artifacts.summary_path)?;
    let parsed: RunSummary = serde_json::from_str(&raw)?;
    for key in outcome.snapshot.keys() {
        assert_eq!(
            parsed.metrics.get(key),
            outcome.snapshot.get(key),
            "metric {} changed in the summary",
            key.as_str()
        );
    }
    assert_eq!(parsed.exit_criteria.passed, 8);
    assert_eq!(parsed.exit_criteria.detail.len(), 8);
    assert_eq!(parsed.trend.len(), 5);

    let value: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(value["metrics"]["coverage"], serde_json::json!(96.0));
    assert_eq!(value["metrics"]["stability_index"], serde_json::json!(100));
    Ok(())
}

#[test]
fn test_dashboard_written_unless_disabled() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::TempDir::new()?;
    let log_path = write_log(tempdir.path(), HEALTHY_LOG)?;
    let mut config = config_for(tempdir.path());

    let (_, artifacts) = pipeline::run(&log_path, &config)?;
    let dashboard = artifacts.dashboard_path.ok_or("dashboard missing")?;
    assert_eq!(dashboard, config.output_dir.join(DASHBOARD_FILE));
    let html = fs::read_to_string(&dashboard)?;
    assert!(html.contains("<svg"));
    assert!(html.contains("APPROVED"));

    fs::remove_file(&dashboard)?;
    config.html_report = false;
    let (outcome, artifacts) = pipeline::run(&log_path, &config)?;
    assert!(artifacts.dashboard_path.is_none());
    assert!(!dashboard.exists());

    let console = report::render_console(&outcome.snapshot, &outcome.exit_criteria);
    assert!(console.contains("FINAL RESULT: 8/8 criteria met"));
    Ok(())
}
