//! Defect store: the in-memory defect log and its CSV loader.
//!
//! The loader expects a header row naming at least `date`, `severity` and
//! `status`. `id` and `resolved_date` are optional; any other column is
//! ignored. Column order is free.
//!
//! Handles:
//! - Double-quoted fields (with `""` escapes)
//! - Blank lines
//! - A leading UTF-8 byte order mark
//! - Date-only and date-time stamps

use crate::error::LoadError;
use crate::models::{DefectRecord, Severity, Status};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Ordered, read-only collection of defect records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefectCollection {
    records: Vec<DefectRecord>,
}

impl DefectCollection {
    pub fn new(records: Vec<DefectRecord>) -> Self {
        DefectCollection { records }
    }

    pub fn records(&self) -> &[DefectRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DefectRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Latest timestamp in the log, `None` when empty.
    pub fn latest_date(&self) -> Option<NaiveDateTime> {
        self.records.iter().map(|r| r.date).max()
    }

    /// Number of records matching `predicate`.
    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&DefectRecord) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).count()
    }

    /// Unresolved (new/open) records of the given severity.
    pub fn open_with_severity(&self, severity: &Severity) -> usize {
        self.count_where(|r| &r.severity == severity && r.status.is_unresolved())
    }

    /// Records per severity, most frequent first.
    pub fn severity_counts(&self) -> Vec<(String, usize)> {
        value_counts(self.records.iter().map(|r| r.severity.as_str()))
    }

    /// Records per status, most frequent first.
    pub fn status_counts(&self) -> Vec<(String, usize)> {
        value_counts(self.records.iter().map(|r| r.status.as_str()))
    }
}

impl FromIterator<DefectRecord> for DefectCollection {
    fn from_iter<I: IntoIterator<Item = DefectRecord>>(iter: I) -> Self {
        DefectCollection::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DefectCollection {
    type Item = &'a DefectRecord;
    type IntoIter = std::slice::Iter<'a, DefectRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// Parse a date or date-time stamp. Date-only values land at midnight.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|day| day.and_time(chrono::NaiveTime::MIN))
}

/// Load a defect log from a CSV file.
pub fn load_csv(path: &Path) -> Result<DefectCollection, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::FileNotFound(path.display().to_string())
        } else {
            LoadError::IoError(e)
        }
    })?;

    let collection = parse_csv(&content)?;
    log::info!(
        "[Store] Loaded {} defect records from {}",
        collection.len(),
        path.display()
    );
    Ok(collection)
}

/// Parse CSV text into a defect collection.
pub fn parse_csv(content: &str) -> Result<DefectCollection, LoadError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines.next().ok_or(LoadError::MissingHeader)?;
    let header: Vec<String> = split_fields(header_line)
        .into_iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();

    let column = |name: &str| header.iter().position(|h| h == name);
    let require = |name: &str| column(name).ok_or_else(|| LoadError::MissingColumn(name.to_string()));

    let date_col = require("date")?;
    let severity_col = require("severity")?;
    let status_col = require("status")?;
    let id_col = column("id");
    let resolved_col = column("resolved_date");

    let mut records = Vec::new();
    for (row, (line_no, line)) in lines.enumerate() {
        let fields = split_fields(line);
        if fields.len() != header.len() {
            return Err(LoadError::FieldCount {
                line: line_no,
                expected: header.len(),
                found: fields.len(),
            });
        }

        let date = parse_date(&fields[date_col]).ok_or_else(|| LoadError::InvalidDate {
            line: line_no,
            value: fields[date_col].clone(),
        })?;

        let resolved_date = match resolved_col.map(|c| fields[c].trim()) {
            Some(raw) if !raw.is_empty() => {
                Some(parse_date(raw).ok_or_else(|| LoadError::InvalidDate {
                    line: line_no,
                    value: raw.to_string(),
                })?)
            }
            _ => None,
        };

        let id = id_col
            .map(|c| fields[c].trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| (row + 1).to_string());

        if resolved_date.is_some_and(|resolved| resolved < date) {
            return Err(LoadError::ResolvedBeforeFiled { line: line_no, id });
        }

        records.push(DefectRecord {
            id,
            date,
            severity: Severity::parse(&fields[severity_col]),
            status: Status::parse(&fields[status_col]),
            resolved_date,
        });
    }

    log::debug!("[Store] Parsed {} rows ({} columns)", records.len(), header.len());
    Ok(DefectCollection::new(records))
}

/// Split one CSV line into fields, honoring double quotes.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            '\r' if !in_quotes => {}
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "date,severity,status\n\
                          2024-05-01,critical,open\n\
                          2024-05-02,high,fixed\n\
                          2024-05-02,low,closed\n";

    #[test]
    fn test_parse_basic_csv() {
        let collection = parse_csv(SAMPLE).unwrap();
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.records()[0].id, "1");
        assert_eq!(collection.records()[0].severity, Severity::Critical);
        assert_eq!(collection.records()[2].status, Status::Closed);
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let csv = "status,module,id,severity,date\nnew,auth,BUG-7,medium,2024-05-03 10:30:00\n";
        let collection = parse_csv(csv).unwrap();
        let record = &collection.records()[0];
        assert_eq!(record.id, "BUG-7");
        assert_eq!(record.status, Status::New);
        assert_eq!(record.date, parse_date("2024-05-03T10:30:00").unwrap());
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let err = parse_csv("date,status\n2024-05-01,new\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "severity"));
    }

    #[test]
    fn test_bad_date_reports_line() {
        let err = parse_csv("date,severity,status\n\n2024-13-45,low,new\n").unwrap_err();
        match err {
            LoadError::InvalidDate { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "2024-13-45");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolved_before_filed_is_fatal() {
        let csv = "id,date,severity,status,resolved_date\n\
                   A-1,2024-01-02,low,fixed,2024-01-03\n\
                   A-2,2024-01-10,high,fixed,2024-01-01\n";
        match parse_csv(csv).unwrap_err() {
            LoadError::ResolvedBeforeFiled { line, id } => {
                assert_eq!(line, 3);
                assert_eq!(id, "A-2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_same_day_resolution_is_accepted() {
        let csv = "date,severity,status,resolved_date\n2024-01-10 09:00:00,low,closed,2024-01-10 09:00:00\n";
        let collection = parse_csv(csv).unwrap();
        assert_eq!(collection.records()[0].resolution_days(), Some(0.0));
    }

    #[test]
    fn test_field_count_mismatch() {
        let err = parse_csv("date,severity,status\n2024-05-01,low\n").unwrap_err();
        assert!(matches!(err, LoadError::FieldCount { expected: 3, found: 2, .. }));
    }

    #[test]
    fn test_empty_input_has_no_header() {
        assert!(matches!(parse_csv("\n\n"), Err(LoadError::MissingHeader)));
    }

    #[test]
    fn test_header_only_is_empty_collection() {
        let collection = parse_csv("\u{feff}date,severity,status\r\n").unwrap();
        assert!(collection.is_empty());
        assert_eq!(collection.latest_date(), None);
    }

    #[test]
    fn test_quoted_fields() {
        assert_eq!(
            split_fields(r#"a,"b, c","say ""hi""""#),
            vec!["a", "b, c", r#"say "hi""#]
        );
    }

    #[test]
    fn test_resolved_date_column() {
        let csv = "date,severity,status,resolved_date\n\
                   2024-05-01,low,fixed,2024-05-03\n\
                   2024-05-02,low,open,\n";
        let collection = parse_csv(csv).unwrap();
        assert_eq!(collection.records()[0].resolution_days(), Some(2.0));
        assert_eq!(collection.records()[1].resolved_date, None);
    }

    #[test]
    fn test_value_counts_order() {
        let collection = parse_csv(SAMPLE).unwrap();
        assert_eq!(
            collection.status_counts(),
            vec![
                ("closed".to_string(), 1),
                ("fixed".to_string(), 1),
                ("open".to_string(), 1)
            ]
        );
        assert_eq!(collection.open_with_severity(&Severity::Critical), 1);
        assert_eq!(collection.open_with_severity(&Severity::High), 0);
    }
}
