//! Summary statistics over a validated record sequence.
//!
//! The aggregator is purely mathematical: identical input and identical window
//! bounds always produce identical output. It never re-validates domain range
//! (ingestion already enforced "is a finite number"), and it fails with
//! `EmptyDataset` instead of producing NaN when there is nothing to aggregate.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::domain::{AdherenceRecord, DatasetSummary, TimeWindow};
use crate::error::AppError;

/// Compute summary statistics, optionally restricted to a closed timestamp
/// interval.
///
/// `group_by` names the column used for distinct-group counting (typically
/// `patientId`). Records lacking the column are all counted as members of one
/// single "undefined" group; this mirrors the dashboard's observed behavior
/// and is deliberate, not an error.
pub fn summarize(
    records: &[AdherenceRecord],
    group_by: &str,
    window: Option<TimeWindow>,
) -> Result<DatasetSummary, AppError> {
    let selected: Vec<&AdherenceRecord> = match window {
        Some(w) => records.iter().filter(|r| w.contains(r.timestamp)).collect(),
        None => records.iter().collect(),
    };

    if selected.is_empty() {
        let message = if records.is_empty() {
            "No records to aggregate."
        } else {
            "No records within the selected time window."
        };
        return Err(AppError::EmptyDataset(message.to_string()));
    }

    let groups: HashSet<Option<&str>> = selected.iter().map(|r| r.field(group_by)).collect();

    let mut min_adherence = f64::INFINITY;
    let mut max_adherence = f64::NEG_INFINITY;
    let mut sum_adherence = 0.0;
    let (mut min_ts, mut max_ts) = (f64::INFINITY, f64::NEG_INFINITY);

    for r in &selected {
        min_adherence = min_adherence.min(r.adherence_rate);
        max_adherence = max_adherence.max(r.adherence_rate);
        sum_adherence += r.adherence_rate;
        min_ts = min_ts.min(r.timestamp);
        max_ts = max_ts.max(r.timestamp);
    }

    Ok(DatasetSummary {
        record_count: selected.len(),
        unique_patient_count: groups.len(),
        mean_adherence: sum_adherence / selected.len() as f64,
        min_adherence,
        max_adherence,
        start_date: seconds_to_datetime(min_ts)?,
        end_date: seconds_to_datetime(max_ts)?,
    })
}

/// Minimum and maximum `timestamp` over a record set, in unix seconds.
///
/// Used to default the suggestion window to the full data range.
pub fn timestamp_bounds(records: &[AdherenceRecord]) -> Option<(f64, f64)> {
    let first = records.first()?;
    let mut bounds = (first.timestamp, first.timestamp);
    for r in records {
        bounds.0 = bounds.0.min(r.timestamp);
        bounds.1 = bounds.1.max(r.timestamp);
    }
    Some(bounds)
}

/// Unit conversion contract: timestamps are stored in unix **seconds**, date
/// types want **milliseconds**. Getting this wrong misformats every displayed
/// date by a factor of 1000.
fn seconds_to_datetime(seconds: f64) -> Result<DateTime<Utc>, AppError> {
    let millis = (seconds * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        AppError::MalformedInput(format!("Timestamp out of representable range: {seconds}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_GROUP_COLUMN;
    use std::collections::BTreeMap;

    fn record(timestamp: f64, adherence_rate: f64) -> AdherenceRecord {
        AdherenceRecord {
            timestamp,
            adherence_rate,
            extras: BTreeMap::new(),
        }
    }

    fn record_for(timestamp: f64, adherence_rate: f64, patient: &str) -> AdherenceRecord {
        let mut r = record(timestamp, adherence_rate);
        r.extras.insert(DEFAULT_GROUP_COLUMN.to_string(), patient.to_string());
        r
    }

    #[test]
    fn two_record_fixture() {
        let records = vec![record(1.0, 0.5), record(2.0, 1.0)];
        let s = summarize(&records, DEFAULT_GROUP_COLUMN, None).unwrap();

        assert_eq!(s.record_count, 2);
        assert!((s.mean_adherence - 0.75).abs() < 1e-12);
        assert_eq!(s.min_adherence, 0.5);
        assert_eq!(s.max_adherence, 1.0);
    }

    #[test]
    fn empty_input_fails_instead_of_nan() {
        let err = summarize(&[], DEFAULT_GROUP_COLUMN, None).unwrap_err();
        assert!(matches!(err, AppError::EmptyDataset(_)));
    }

    #[test]
    fn empty_window_fails() {
        let records = vec![record(1.0, 0.5), record(2.0, 1.0)];
        let err = summarize(&records, DEFAULT_GROUP_COLUMN, Some(TimeWindow::new(5.0, 9.0)))
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyDataset(_)));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let records = vec![record(1.0, 0.5), record(2.0, 1.0)];
        let s = summarize(&records, DEFAULT_GROUP_COLUMN, Some(TimeWindow::new(2.0, 2.0))).unwrap();

        assert_eq!(s.record_count, 1);
        assert_eq!(s.mean_adherence, 1.0);
    }

    #[test]
    fn distinct_group_counting() {
        let records = vec![
            record_for(1.0, 0.8, "P001"),
            record_for(2.0, 0.9, "P002"),
            record_for(3.0, 0.7, "P001"),
        ];
        let s = summarize(&records, DEFAULT_GROUP_COLUMN, None).unwrap();
        assert_eq!(s.unique_patient_count, 2);
    }

    #[test]
    fn records_without_the_group_column_form_one_group() {
        // All records lacking the grouping column count as a single group,
        // including when mixed with records that do carry it.
        let records = vec![record(1.0, 0.8), record(2.0, 0.9)];
        let s = summarize(&records, DEFAULT_GROUP_COLUMN, None).unwrap();
        assert_eq!(s.unique_patient_count, 1);

        let mixed = vec![record(1.0, 0.8), record(2.0, 0.9), record_for(3.0, 0.7, "P001")];
        let s = summarize(&mixed, DEFAULT_GROUP_COLUMN, None).unwrap();
        assert_eq!(s.unique_patient_count, 2);
    }

    #[test]
    fn dates_use_milliseconds_from_unix_seconds() {
        // 2023-01-01T00:00:00Z
        let records = vec![record(1672531200.0, 0.85), record(1672617600.0, 0.9)];
        let s = summarize(&records, DEFAULT_GROUP_COLUMN, None).unwrap();

        assert_eq!(s.start_date.timestamp_millis(), 1_672_531_200_000);
        assert_eq!(s.end_date.timestamp_millis(), 1_672_617_600_000);
        assert_eq!(s.start_date.format("%Y-%m-%d").to_string(), "2023-01-01");
    }

    #[test]
    fn adherence_outside_unit_interval_is_not_revalidated() {
        let records = vec![record(1.0, 1.5), record(2.0, -0.25)];
        let s = summarize(&records, DEFAULT_GROUP_COLUMN, None).unwrap();
        assert_eq!(s.max_adherence, 1.5);
        assert_eq!(s.min_adherence, -0.25);
    }

    #[test]
    fn timestamp_bounds_basic() {
        assert_eq!(timestamp_bounds(&[]), None);
        let records = vec![record(3.0, 0.5), record(1.0, 0.5), record(2.0, 0.5)];
        assert_eq!(timestamp_bounds(&records), Some((1.0, 3.0)));
    }
}
