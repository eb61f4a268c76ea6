//! Defect Metrics
//!
//! Testing quality metrics and release exit criteria computed from a defect
//! log. Each run recomputes everything from one flat snapshot of the log.
//!
//! The system is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **models**: Defect records, categories and trend types
//! - **policy**: Release policy constants and exit thresholds
//! - **store**: In-memory defect collection and CSV loader
//! - **metrics**: Metrics engine and snapshot
//! - **trend**: Daily trend series and direction classifier
//! - **exit_criteria**: Eight-criteria release gate
//! - **config**: Run configuration (JSON/TOML)
//! - **report**: Console, JSON and HTML artifacts
//! - **pipeline**: One sequential run over a defect log
//! - **log_collector**: `log` backend for stderr and run files

// Core foundational modules
pub mod error;
pub mod models;
pub mod policy;

// Defect store
pub mod store;

// Metrics, trend and exit criteria
pub mod exit_criteria;
pub mod metrics;
pub mod trend;

// Run configuration
pub mod config;

// Artifacts and orchestration
pub mod pipeline;
pub mod report;

// Logging backend
pub mod log_collector;

// Re-export the log crate for macro usage
pub use log;

// ============================================================================
// PUBLIC RE-EXPORTS FOR CONVENIENCE
// ============================================================================

pub use error::{ConfigError, LoadError, MetricsError, ReportError, Result};

pub use models::{DefectRecord, Severity, Status, TrendDay, TrendLabel};

pub use policy::ExitPolicy;

pub use store::DefectCollection;

pub use metrics::{
    Measurement, MetricKey, MetricValue, MetricsEngine, MetricsSnapshot, ResolutionTimeMode,
};

pub use trend::{TrendAnalyzer, TrendReport};

pub use exit_criteria::{CriterionOutcome, ExitCriteriaEvaluator, ExitCriteriaResult};

pub use config::RunConfig;

pub use report::RunSummary;

pub use log_collector::{initialize_logging, LogCollector};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
