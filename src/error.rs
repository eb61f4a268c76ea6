//! Unified error type hierarchy for Defect Metrics
//!
//! Provides structured error handling with LoadError, ConfigError, ReportError
//! and the crate-wide MetricsError.
//!
//! Degenerate data (an empty log, a zero denominator) is never an error: the
//! metric yields 0 and the run continues. Only precondition failures on the
//! input surface here.

use std::io;
use thiserror::Error;

/// Defect log loading errors. All of these abort the run.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Defect log not found: {0}")]
    FileNotFound(String),

    #[error("Defect log is empty (no header row)")]
    MissingHeader,

    #[error("Required column missing from defect log: {0}")]
    MissingColumn(String),

    #[error("Line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: unparsable date '{value}'")]
    InvalidDate { line: usize, value: String },

    #[error("Line {line}: defect {id} resolved before it was filed")]
    ResolvedBeforeFiled { line: usize, id: String },

    #[error("IO error while reading defect log: {0}")]
    IoError(#[from] io::Error),
}

/// Configuration file parsing and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid JSON in config: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Failed to serialize config as JSON: {0}")]
    JsonSerialize(#[source] serde_json::Error),

    #[error("Invalid TOML in config: {0}")]
    InvalidToml(#[from] toml::de::Error),

    #[error("Failed to serialize config as TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Report artifact errors.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to serialize run summary: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write report artifact {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Global error type for all Defect Metrics modules.
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl MetricsError {
    /// Get a user-facing error message suitable for console display
    pub fn user_message(&self) -> String {
        match self {
            MetricsError::Load(e) => format!("Could not load the defect log: {}", e),
            MetricsError::Config(e) => format!("Configuration error: {}", e),
            MetricsError::Report(e) => format!("Could not write the report: {}", e),
        }
    }
}

/// Top-level result type for operations that may fail.
pub type Result<T> = std::result::Result<T, MetricsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = LoadError::MissingColumn("severity".to_string());
        assert_eq!(
            err.to_string(),
            "Required column missing from defect log: severity"
        );
    }

    #[test]
    fn test_field_count_display() {
        let err = LoadError::FieldCount {
            line: 4,
            expected: 3,
            found: 2,
        };
        assert_eq!(err.to_string(), "Line 4: expected 3 fields, found 2");
    }

    #[test]
    fn test_resolved_before_filed_display() {
        let err = LoadError::ResolvedBeforeFiled {
            line: 7,
            id: "BUG-3".to_string(),
        };
        assert_eq!(err.to_string(), "Line 7: defect BUG-3 resolved before it was filed");
    }

    #[test]
    fn test_user_message_wraps_source() {
        let err: MetricsError = ConfigError::ValidationFailed("bad window".to_string()).into();
        assert_eq!(
            err.user_message(),
            "Configuration error: Configuration validation failed: bad window"
        );
    }

    #[test]
    fn test_result_type_ok() {
        let result: Result<i32> = Ok(42);
        assert!(result.is_ok());
    }
}
