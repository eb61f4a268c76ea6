//! Ordered metric snapshot.
//!
//! Serializes as a flat JSON object (`{"coverage": 96.0, ...}`) in insertion
//! order. Deserialization keeps the order of the source document.

use super::{Measurement, MetricKey, MetricValue};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Metric values keyed by [`MetricKey`], in computation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    entries: Vec<(MetricKey, MetricValue)>,
}

impl MetricsSnapshot {
    pub fn new() -> Self {
        MetricsSnapshot::default()
    }

    /// Snapshot with `measurement` recorded. A repeated key keeps its original
    /// position and takes the new value; degenerate measurements are skipped.
    pub fn with(mut self, measurement: Measurement) -> Self {
        if measurement.degenerate {
            return self;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == measurement.key) {
            Some(entry) => entry.1 = measurement.value,
            None => self.entries.push((measurement.key, measurement.value)),
        }
        self
    }

    /// Fold every entry of `other` into this snapshot.
    pub fn merge(self, other: MetricsSnapshot) -> Self {
        other
            .entries
            .into_iter()
            .fold(self, |acc, (key, value)| {
                acc.with(Measurement {
                    key,
                    value,
                    degenerate: false,
                })
            })
    }

    pub fn get(&self, key: MetricKey) -> Option<&MetricValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn number(&self, key: MetricKey) -> Option<f64> {
        self.get(key).and_then(MetricValue::as_f64)
    }

    pub fn label(&self, key: MetricKey) -> Option<&str> {
        self.get(key).and_then(MetricValue::as_label)
    }

    pub fn contains(&self, key: MetricKey) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = MetricKey> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, &MetricValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Measurement> for MetricsSnapshot {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        iter.into_iter().fold(MetricsSnapshot::new(), MetricsSnapshot::with)
    }
}

impl Serialize for MetricsSnapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MetricsSnapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = MetricsSnapshot;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of metric names to numbers or labels")
            }

            fn visit_map<A>(self, mut access: A) -> Result<MetricsSnapshot, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut snapshot = MetricsSnapshot::new();
                while let Some((key, value)) = access.next_entry::<MetricKey, MetricValue>()? {
                    snapshot = snapshot.with(Measurement {
                        key,
                        value,
                        degenerate: false,
                    });
                }
                Ok(snapshot)
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_replaces_in_place() {
        let snapshot = MetricsSnapshot::new()
            .with(Measurement::number(MetricKey::Coverage, 50.0))
            .with(Measurement::number(MetricKey::DefectRate, 1.0))
            .with(Measurement::number(MetricKey::Coverage, 75.0));

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.keys().next(), Some(MetricKey::Coverage));
        assert_eq!(snapshot.number(MetricKey::Coverage), Some(75.0));
    }

    #[test]
    fn test_degenerate_is_not_recorded() {
        let snapshot = MetricsSnapshot::new().with(Measurement::degenerate(MetricKey::Coverage));
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_merge_appends_new_keys() {
        let base = MetricsSnapshot::new().with(Measurement::number(MetricKey::Coverage, 90.0));
        let trend = MetricsSnapshot::new().with(Measurement::label(MetricKey::DefectTrend, "stable"));
        let merged = base.merge(trend);
        assert_eq!(merged.label(MetricKey::DefectTrend), Some("stable"));
        assert_eq!(merged.number(MetricKey::Coverage), Some(90.0));
    }

    #[test]
    fn test_serializes_flat_in_order() {
        let snapshot = MetricsSnapshot::new()
            .with(Measurement::number(MetricKey::TestingEfficiency, 95.0))
            .with(Measurement::integer(MetricKey::StabilityIndex, 80))
            .with(Measurement::label(MetricKey::DefectTrend, "descending"));

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(
            json,
            r#"{"testing_efficiency":95.0,"stability_index":80,"defect_trend":"descending"}"#
        );

        let parsed: MetricsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result: Result<MetricsSnapshot, _> = serde_json::from_str(r#"{"tasa_retest":25}"#);
        assert!(result.is_err());
    }
}
