//! Missing-data analysis.
//!
//! The extract encodes "no data" three ways: a truly absent value, an
//! empty string, and a run of `0` digits padded to the column width
//! (`"0"`, `"000000"`, …). All three count as missing everywhere in this
//! pipeline.

use serde::Serialize;

use sih_model::RawTable;

/// True for a zero-run sentinel: a non-empty string of only `'0'` digits.
pub fn is_sentinel(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.bytes().all(|b| b == b'0')
}

/// True when a cell carries no usable data.
pub fn is_missing_cell(cell: Option<&str>) -> bool {
    match cell {
        None => true,
        Some(value) => value.trim().is_empty() || is_sentinel(value),
    }
}

/// Per-column missingness, as reported by [`analyze_missing`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMissingness {
    pub column: String,
    pub missing: usize,
    pub percent: f64,
}

/// Counts missing values per column, sorted descending by percentage.
///
/// Read-only diagnostic; an empty table yields an empty report.
pub fn analyze_missing(table: &RawTable) -> Vec<ColumnMissingness> {
    let total = table.row_count();
    if total == 0 {
        return Vec::new();
    }

    let mut stats: Vec<ColumnMissingness> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let missing = table
                .rows()
                .iter()
                .filter(|row| is_missing_cell(row[idx].as_deref()))
                .count();
            ColumnMissingness {
                column: column.clone(),
                missing,
                percent: (missing as f64 / total as f64) * 100.0,
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.percent
            .partial_cmp(&a.percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    stats
}
