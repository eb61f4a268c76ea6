//! Core data types for Defect Metrics.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Defect severity. Open set: values outside the four known levels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Other(String),
}

impl Severity {
    /// Parse a raw category value (trimmed, case-insensitive).
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim().to_ascii_lowercase();
        match value.as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Other(value),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Other(value) => value,
        }
    }

    /// Critical or high: the levels counted by critical density.
    pub fn is_severe(&self) -> bool {
        matches!(self, Severity::Critical | Severity::High)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        Severity::parse(&value)
    }
}

impl From<Severity> for String {
    fn from(value: Severity) -> Self {
        value.as_str().to_string()
    }
}

/// Defect workflow status. Open set like [`Severity`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    New,
    Open,
    Fixed,
    Closed,
    Other(String),
}

impl Status {
    /// Parse a raw category value (trimmed, case-insensitive).
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim().to_ascii_lowercase();
        match value.as_str() {
            "new" => Status::New,
            "open" => Status::Open,
            "fixed" => Status::Fixed,
            "closed" => Status::Closed,
            _ => Status::Other(value),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::New => "new",
            Status::Open => "open",
            Status::Fixed => "fixed",
            Status::Closed => "closed",
            Status::Other(value) => value,
        }
    }

    /// New or open.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Status::New | Status::Open)
    }

    /// Fixed or closed.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Status::Fixed | Status::Closed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        Status::parse(&value)
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        value.as_str().to_string()
    }
}

/// One row of the defect log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectRecord {
    /// Row identity: the `id` column when present, else the 1-based row number
    pub id: String,
    pub date: NaiveDateTime,
    pub severity: Severity,
    pub status: Status,
    /// When the defect was resolved, if the log records it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_date: Option<NaiveDateTime>,
}

impl DefectRecord {
    /// Record dated at midnight of `day`, without a resolution date.
    pub fn new(id: impl Into<String>, day: NaiveDate, severity: Severity, status: Status) -> Self {
        DefectRecord {
            id: id.into(),
            date: day.and_time(chrono::NaiveTime::MIN),
            severity,
            status,
            resolved_date: None,
        }
    }

    pub fn with_resolved_date(mut self, resolved: NaiveDateTime) -> Self {
        self.resolved_date = Some(resolved);
        self
    }

    /// Resolution duration in fractional days, if both dates are known.
    pub fn resolution_days(&self) -> Option<f64> {
        self.resolved_date
            .map(|resolved| (resolved - self.date).num_seconds() as f64 / 86_400.0)
    }
}

/// Direction of the daily new-defect series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendLabel {
    #[serde(rename = "descending")]
    Descending,
    #[serde(rename = "ascending")]
    Ascending,
    #[serde(rename = "stable")]
    Stable,
    #[serde(rename = "insufficient data")]
    InsufficientData,
}

impl TrendLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLabel::Descending => "descending",
            TrendLabel::Ascending => "ascending",
            TrendLabel::Stable => "stable",
            TrendLabel::InsufficientData => "insufficient data",
        }
    }

    /// Parse a label produced by [`TrendLabel::as_str`].
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "descending" => Some(TrendLabel::Descending),
            "ascending" => Some(TrendLabel::Ascending),
            "stable" => Some(TrendLabel::Stable),
            "insufficient data" => Some(TrendLabel::InsufficientData),
            _ => None,
        }
    }

    /// Short symbol for console and badge display
    pub fn symbol(&self) -> &'static str {
        match self {
            TrendLabel::Descending => "✓",
            TrendLabel::Ascending => "⚠",
            TrendLabel::Stable => "~",
            TrendLabel::InsufficientData => "?",
        }
    }

    /// Descending is the only favorable direction.
    pub fn is_favorable(&self) -> bool {
        matches!(self, TrendLabel::Descending)
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One calendar day of the trend window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendDay {
    pub day: NaiveDate,
    /// Records dated this day with status new/open
    pub new_count: u32,
    /// Records dated this day with status fixed/closed
    pub closed_count: u32,
    /// Running open count, floored at zero
    pub cumulative_open: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse_is_case_insensitive() {
        assert_eq!(Severity::parse(" Critical "), Severity::Critical);
        assert_eq!(Severity::parse("HIGH"), Severity::High);
        assert_eq!(
            Severity::parse("blocker"),
            Severity::Other("blocker".to_string())
        );
    }

    #[test]
    fn test_severe_levels() {
        assert!(Severity::Critical.is_severe());
        assert!(Severity::High.is_severe());
        assert!(!Severity::Medium.is_severe());
        assert!(!Severity::Other("blocker".to_string()).is_severe());
    }

    #[test]
    fn test_status_partitions() {
        assert!(Status::New.is_unresolved());
        assert!(Status::Open.is_unresolved());
        assert!(Status::Fixed.is_resolved());
        assert!(Status::Closed.is_resolved());

        let other = Status::parse("deferred");
        assert!(!other.is_resolved());
        assert!(!other.is_unresolved());
        assert_eq!(other.to_string(), "deferred");
    }

    #[test]
    fn test_resolution_days() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let record = DefectRecord::new("1", day, Severity::Low, Status::Fixed).with_resolved_date(
            NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        );
        assert_eq!(record.resolution_days(), Some(3.5));
    }

    #[test]
    fn test_trend_label_round_trip() {
        for label in [
            TrendLabel::Descending,
            TrendLabel::Ascending,
            TrendLabel::Stable,
            TrendLabel::InsufficientData,
        ] {
            assert_eq!(TrendLabel::from_label(label.as_str()), Some(label));
        }
        assert_eq!(TrendLabel::from_label("DESCENDENTE"), None);
    }

    #[test]
    fn test_category_serde_as_plain_string() {
        let json = serde_json::to_string(&Severity::High).unwrap();
        assert_eq!(json, "\"high\"");
        let status: Status = serde_json::from_str("\"Closed\"").unwrap();
        assert_eq!(status, Status::Closed);
    }
}
