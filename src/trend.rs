//! Trend analysis over a trailing window of calendar days.
//!
//! The window ends at the latest date in the log (normalized to midnight).
//! Each day counts new/open defects as "new" and fixed/closed defects as
//! "closed"; the running open count never drops below zero. Direction is read
//! from the last three days of the new series only.

use crate::metrics::{Measurement, MetricKey};
use crate::models::{TrendDay, TrendLabel};
use crate::policy::TREND_CLASSIFICATION_DAYS;
use crate::store::DefectCollection;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Per-day series plus the classified direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub days: Vec<TrendDay>,
    pub label: TrendLabel,
}

impl TrendReport {
    /// The label as a snapshot measurement.
    pub fn measurement(&self) -> Measurement {
        Measurement::label(MetricKey::DefectTrend, self.label.as_str())
    }

    pub fn new_series(&self) -> Vec<u32> {
        self.days.iter().map(|d| d.new_count).collect()
    }
}

/// Buckets a defect collection by day.
pub struct TrendAnalyzer<'a> {
    defects: &'a DefectCollection,
}

impl<'a> TrendAnalyzer<'a> {
    pub fn new(defects: &'a DefectCollection) -> Self {
        TrendAnalyzer { defects }
    }

    /// Build the `window_days` series ending at the latest record and classify it.
    pub fn detect_trend(&self, window_days: u32) -> TrendReport {
        let anchor = match self.defects.latest_date() {
            Some(latest) => latest.date(),
            None => {
                log::warn!("[Trend] Empty defect log, no trend window to build");
                return TrendReport {
                    days: Vec::new(),
                    label: TrendLabel::InsufficientData,
                };
            }
        };

        // Walk back from the anchor; the calendar may end before the window does
        let mut days: Vec<NaiveDate> = (0..window_days as i64)
            .map_while(|offset| anchor.checked_sub_signed(Duration::days(offset)))
            .collect();
        days.reverse();
        if days.len() < window_days as usize {
            log::warn!(
                "[Trend] Window truncated to {} of {} days at the start of the calendar",
                days.len(),
                window_days
            );
        }

        let new_counts: Vec<u32> = days
            .iter()
            .map(|day| self.count_on(*day, |r| r.status.is_unresolved()))
            .collect();
        let closed_counts: Vec<u32> = days
            .iter()
            .map(|day| self.count_on(*day, |r| r.status.is_resolved()))
            .collect();
        let open = cumulative_open(&new_counts, &closed_counts);

        let series: Vec<TrendDay> = days
            .iter()
            .enumerate()
            .map(|(i, day)| TrendDay {
                day: *day,
                new_count: new_counts[i],
                closed_count: closed_counts[i],
                cumulative_open: open[i],
            })
            .collect();

        let label = classify_trend(&new_counts);
        log::info!(
            "[Trend] {} day window ending {}: new={:?} -> {}",
            window_days,
            anchor,
            new_counts,
            label
        );

        TrendReport {
            days: series,
            label,
        }
    }

    fn count_on<F>(&self, day: NaiveDate, predicate: F) -> u32
    where
        F: Fn(&crate::models::DefectRecord) -> bool,
    {
        self.defects
            .count_where(|r| r.date.date() == day && predicate(r)) as u32
    }
}

/// Running open count: `open[i] = max(0, open[i-1] + new[i] - closed[i])`, seeded at 0.
pub fn cumulative_open(new_counts: &[u32], closed_counts: &[u32]) -> Vec<u32> {
    let mut open: i64 = 0;
    new_counts
        .iter()
        .zip(closed_counts)
        .map(|(&new, &closed)| {
            open = (open + new as i64 - closed as i64).max(0);
            open as u32
        })
        .collect()
}

/// Direction of the last three values of the new-defect series.
///
/// Non-increasing wins over non-decreasing, so a flat tail is descending.
pub fn classify_trend(new_counts: &[u32]) -> TrendLabel {
    if new_counts.len() < TREND_CLASSIFICATION_DAYS {
        return TrendLabel::InsufficientData;
    }
    let tail = &new_counts[new_counts.len() - TREND_CLASSIFICATION_DAYS..];

    if tail.windows(2).all(|w| w[1] <= w[0]) {
        TrendLabel::Descending
    } else if tail.windows(2).all(|w| w[1] >= w[0]) {
        TrendLabel::Ascending
    } else {
        TrendLabel::Stable
    }
}
