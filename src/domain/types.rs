//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - held in-memory for the lifetime of a session
//! - exported back to CSV/JSON
//! - handed to the suggestion client without further transformation

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Required column: observation time, unix seconds.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Required column: adherence fraction, intended range [0, 1].
pub const ADHERENCE_COLUMN: &str = "adherenceRate";

/// Default grouping column for distinct-group counting.
pub const DEFAULT_GROUP_COLUMN: &str = "patientId";

/// One adherence observation.
///
/// The two required fields are fixed struct members; every other CSV column
/// lands in `extras` as a trimmed string. This keeps the record a plain value
/// type (no dynamic property bag) while still accepting arbitrary columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdherenceRecord {
    /// Unix timestamp in seconds. Only "parses as a finite number" is
    /// enforced; sub-second fractions are allowed.
    pub timestamp: f64,

    /// Adherence rate at this timestamp. Values outside [0, 1] are accepted;
    /// ingestion only enforces "finite number".
    #[serde(rename = "adherenceRate")]
    pub adherence_rate: f64,

    /// Additional CSV columns, keyed by header name, values verbatim.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl AdherenceRecord {
    /// Look up an optional (non-required) field by column name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.extras.get(name).map(String::as_str)
    }
}

/// A validated dataset: records in input order plus the header that produced
/// them.
///
/// Keeping the ordered column list alongside the records makes the CSV
/// round-trip export lossless (extras maps alone would forget column order).
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Header columns in file order (required columns included).
    pub columns: Vec<String>,
    /// Records in input row order. Duplicates are valid.
    pub records: Vec<AdherenceRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Closed `[start, end]` interval over `timestamp`, in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, timestamp: f64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

/// Summary statistics over a (possibly windowed) record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    /// Total records in the aggregated set.
    pub record_count: usize,
    /// Distinct values of the grouping column. Records lacking the column are
    /// all counted as members of a single "undefined" group.
    pub unique_patient_count: usize,
    pub mean_adherence: f64,
    pub min_adherence: f64,
    pub max_adherence: f64,
    /// Earliest observation. Derived from unix seconds × 1000: the stored
    /// unit is seconds, date types want milliseconds.
    pub start_date: DateTime<Utc>,
    /// Latest observation (same unit conversion as `start_date`).
    pub end_date: DateTime<Utc>,
}

/// One suggestion returned by the remote analysis model (pass-through).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSuggestion {
    /// e.g. "trend detection", "seasonality analysis", "anomaly detection".
    pub analysis_type: String,
    pub description: String,
    pub rationale: String,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// CSV input path; `None` means read stdin.
    pub input: Option<PathBuf>,
    /// Grouping column for distinct-group counting.
    pub group_by: String,
    /// Optional window start (unix seconds, inclusive).
    pub start: Option<f64>,
    /// Optional window end (unix seconds, inclusive).
    pub end: Option<f64>,
}

impl RunConfig {
    /// Resolve the optional window flags into a `TimeWindow`.
    ///
    /// A bound given alone leaves the other side unbounded.
    pub fn window(&self) -> Option<TimeWindow> {
        if self.start.is_none() && self.end.is_none() {
            return None;
        }
        Some(TimeWindow::new(
            self.start.unwrap_or(f64::NEG_INFINITY),
            self.end.unwrap_or(f64::INFINITY),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_inclusive_on_both_bounds() {
        let w = TimeWindow::new(2.0, 4.0);
        assert!(w.contains(2.0));
        assert!(w.contains(4.0));
        assert!(!w.contains(1.999));
        assert!(!w.contains(4.001));
    }

    #[test]
    fn run_config_window_resolution() {
        let mut config = RunConfig {
            input: None,
            group_by: DEFAULT_GROUP_COLUMN.to_string(),
            start: None,
            end: None,
        };
        assert!(config.window().is_none());

        config.start = Some(10.0);
        let w = config.window().unwrap();
        assert_eq!(w.start, 10.0);
        assert_eq!(w.end, f64::INFINITY);

        config.end = Some(20.0);
        let w = config.window().unwrap();
        assert_eq!(w, TimeWindow::new(10.0, 20.0));
    }
}
