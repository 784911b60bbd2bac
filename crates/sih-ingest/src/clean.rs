//! Raw table cleansing.
//!
//! Order matters: sentinels become nulls first, then sparse columns go,
//! then sparse rows are measured against the reduced column set, then
//! types are coerced, then exact duplicates are dropped, and finally each
//! surviving row is tagged with its source file.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use sih_common::{format_numeric, parse_f64};
use sih_model::{RawTable, columns};

use crate::error::Result;
use crate::missing::{is_missing_cell, is_sentinel};

/// Columns with more than this share of missing values are dropped.
/// Applied per source file, so the surviving column set can differ
/// between months; the consolidator tolerates the skew.
pub const COLUMN_MISSING_LIMIT_PCT: f64 = 95.0;

/// Rows missing more than this share of the surviving columns are dropped.
pub const ROW_MISSING_LIMIT: f64 = 0.7;

/// What the cleanser did to one source table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    pub source: String,
    pub input_rows: usize,
    pub output_rows: usize,
    pub dropped_columns: Vec<String>,
    pub dropped_rows: usize,
    pub duplicate_rows: usize,
}

/// Cleans one raw monthly table and tags every surviving row with
/// `source_tag`.
pub fn clean(mut table: RawTable, source_tag: &str) -> Result<(RawTable, CleanReport)> {
    let mut report = CleanReport {
        source: source_tag.to_string(),
        input_rows: table.row_count(),
        ..CleanReport::default()
    };

    nullify_sentinels(&mut table);
    drop_sparse_columns(&mut table, &mut report);
    drop_sparse_rows(&mut table, &mut report);
    coerce_numeric_columns(&mut table);
    coerce_date_columns(&mut table);
    drop_duplicate_rows(&mut table, &mut report);

    // The tag column also guarantees the output never ends up with zero
    // columns, even when every source column was dropped as sparse. A tag
    // already present (re-processed output) is overwritten.
    match table.column_index(columns::ARQUIVO_ORIGEM) {
        Some(idx) => {
            for row in table.rows_mut() {
                row[idx] = Some(source_tag.to_string());
            }
        }
        None => table.push_column(columns::ARQUIVO_ORIGEM, Some(source_tag.to_string())),
    }
    table.source = Some(source_tag.to_string());

    report.output_rows = table.row_count();
    info!(
        source = source_tag,
        input_rows = report.input_rows,
        output_rows = report.output_rows,
        dropped_columns = report.dropped_columns.len(),
        dropped_rows = report.dropped_rows,
        duplicate_rows = report.duplicate_rows,
        "cleaned source table"
    );
    Ok((table, report))
}

/// Replaces empty strings and zero-run sentinels with nulls, everywhere.
fn nullify_sentinels(table: &mut RawTable) {
    for row in table.rows_mut() {
        for cell in row.iter_mut() {
            let is_null = match cell {
                Some(value) => value.trim().is_empty() || is_sentinel(value),
                None => false,
            };
            if is_null {
                *cell = None;
            }
        }
    }
}

fn drop_sparse_columns(table: &mut RawTable, report: &mut CleanReport) {
    let total = table.row_count();
    if total == 0 {
        return;
    }
    let mut to_drop = Vec::new();
    for (idx, column) in table.columns().iter().enumerate() {
        let missing = table
            .rows()
            .iter()
            .filter(|row| row[idx].is_none())
            .count();
        let percent = (missing as f64 / total as f64) * 100.0;
        if percent > COLUMN_MISSING_LIMIT_PCT {
            debug!(column = %column, percent, "dropping sparse column");
            to_drop.push(column.clone());
        }
    }
    table.drop_columns(&to_drop);
    report.dropped_columns = to_drop;
}

fn drop_sparse_rows(table: &mut RawTable, report: &mut CleanReport) {
    let column_count = table.column_count();
    if column_count == 0 {
        return;
    }
    let threshold = (column_count as f64 * ROW_MISSING_LIMIT) as usize;
    let before = table.row_count();
    table
        .rows_mut()
        .retain(|row| row.iter().filter(|cell| cell.is_none()).count() <= threshold);
    report.dropped_rows = before - table.row_count();
}

/// Coerces the fixed numeric column list; failures become null. A listed
/// column absent from this file is skipped, not an error.
fn coerce_numeric_columns(table: &mut RawTable) {
    for column in columns::NUMERIC_COLUMNS {
        let Some(idx) = table.column_index(column) else {
            continue;
        };
        for row in table.rows_mut() {
            if let Some(value) = row[idx].take() {
                row[idx] = parse_f64(&value).map(format_numeric);
            }
        }
    }
}

/// Coerces the fixed date column list from `YYYYMMDD` to ISO dates;
/// failures become null.
fn coerce_date_columns(table: &mut RawTable) {
    for column in columns::DATE_COLUMNS {
        let Some(idx) = table.column_index(column) else {
            continue;
        };
        for row in table.rows_mut() {
            if let Some(value) = row[idx].take() {
                row[idx] = NaiveDate::parse_from_str(value.trim(), "%Y%m%d")
                    .ok()
                    .map(|date| date.format("%Y-%m-%d").to_string());
            }
        }
    }
}

pub(crate) fn drop_duplicate_rows(table: &mut RawTable, report: &mut CleanReport) {
    let before = table.row_count();
    let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(before);
    table.rows_mut().retain(|row| seen.insert(row.clone()));
    report.duplicate_rows = before - table.row_count();
}

/// Strict post-condition check used by tests: no surviving column or row
/// re-violates the cleansing bounds.
pub fn verify_bounds(table: &RawTable) -> bool {
    let total = table.row_count();
    if total == 0 {
        return true;
    }
    for (idx, _) in table.columns().iter().enumerate() {
        let missing = table
            .rows()
            .iter()
            .filter(|row| is_missing_cell(row[idx].as_deref()))
            .count();
        if (missing as f64 / total as f64) * 100.0 > COLUMN_MISSING_LIMIT_PCT {
            return false;
        }
    }
    let threshold = (table.column_count() as f64 * ROW_MISSING_LIMIT) as usize;
    table
        .rows()
        .iter()
        .all(|row| row.iter().filter(|cell| cell.is_none()).count() <= threshold)
}
