//! CSV ingest and validation.
//!
//! This module turns raw pasted/loaded CSV text into a clean, ordered
//! `Vec<AdherenceRecord>` that is safe to aggregate.
//!
//! Design goals:
//! - **Strict schema** for the two required columns (clear errors + exit code 2)
//! - **Fail-fast**: the first structural or type error aborts the whole import,
//!   with a precise location; there is no partial/best-effort import
//! - **Line-oriented row model**: every physical line after the header is a
//!   data row, so error locations always name the physical line number
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no statistics logic here

use crate::domain::{ADHERENCE_COLUMN, AdherenceRecord, Dataset, TIMESTAMP_COLUMN};
use crate::error::AppError;

/// Parse raw CSV text into a validated [`Dataset`].
///
/// The input is origin-agnostic (pasted text, file contents); whoever loads
/// the string is the caller's concern. Rows are plain comma-split lines (no
/// quoting rules). On success every data row appears in the result, in input
/// order, with no filtering or deduplication.
pub fn parse_records(text: &str) -> Result<Dataset, AppError> {
    // Structural precondition: a header plus at least one data row. Leading
    // and trailing blank lines never count; interior blank lines do, and fail
    // numeric parsing below like any other row with missing required cells.
    let lines: Vec<&str> = text.trim().split('\n').collect();
    if lines.len() < 2 {
        return Err(AppError::MalformedInput(
            "CSV must have a header and at least one data row.".to_string(),
        ));
    }

    let columns: Vec<String> = lines[0].split(',').map(normalize_header_name).collect();

    ensure_required_columns_exist(&columns)?;

    let mut records = Vec::with_capacity(lines.len() - 1);

    for (idx, line) in lines[1..].iter().enumerate() {
        // +2 because:
        // - the header is line 1, so data rows start on line 2
        // - error locations are 1-based physical line numbers
        records.push(parse_row(line, &columns, idx + 2)?);
    }

    log::debug!(
        "ingested {} records across {} columns",
        records.len(),
        columns.len()
    );

    Ok(Dataset { columns, records })
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿timestamp"). If we don't strip it, schema validation
    // will incorrectly report missing columns. Matching stays case-sensitive.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn ensure_required_columns_exist(columns: &[String]) -> Result<(), AppError> {
    for required in [TIMESTAMP_COLUMN, ADHERENCE_COLUMN] {
        if !columns.iter().any(|c| c == required) {
            return Err(AppError::SchemaViolation {
                column: required.to_string(),
            });
        }
    }
    Ok(())
}

fn parse_row(line: &str, columns: &[String], line_no: usize) -> Result<AdherenceRecord, AppError> {
    let cells: Vec<&str> = line.split(',').collect();

    let mut out = AdherenceRecord {
        timestamp: 0.0,
        adherence_rate: 0.0,
        extras: Default::default(),
    };

    // Iteration is header-length-bounded: a row with extra trailing cells
    // silently drops the excess, and a row with fewer cells than the header
    // treats the missing trailing cells as empty strings (which then fail
    // numeric parsing if the missing cell is a required column).
    for (i, column) in columns.iter().enumerate() {
        let value = cells.get(i).map(|s| s.trim()).unwrap_or("");

        if column == TIMESTAMP_COLUMN || column == ADHERENCE_COLUMN {
            let number = parse_finite(value).ok_or_else(|| AppError::TypeMismatch {
                line: line_no,
                column: column.clone(),
            })?;
            if column == TIMESTAMP_COLUMN {
                out.timestamp = number;
            } else {
                out.adherence_rate = number;
            }
        } else {
            out.extras.insert(column.clone(), value.to_string());
        }
    }

    Ok(out)
}

fn parse_finite(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
