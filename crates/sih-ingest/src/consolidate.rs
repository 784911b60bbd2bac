//! Multi-source consolidation.

use serde::Serialize;
use tracing::info;

use sih_model::RawTable;

use crate::clean::{CleanReport, drop_duplicate_rows};
use crate::error::Result;

/// Rows contributed by one source, for the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceContribution {
    pub source: String,
    pub rows: usize,
}

/// Merges cleaned monthly tables into one combined table.
///
/// Columns are the union of all inputs in first-seen order; a column a
/// given month dropped as sparse is null-filled there. Row order is
/// preserved within and across sources, then exact duplicates are
/// removed — running this again over its own output is a no-op.
pub fn consolidate(tables: Vec<RawTable>) -> Result<(RawTable, Vec<SourceContribution>)> {
    let mut union_columns: Vec<String> = Vec::new();
    for table in &tables {
        for column in table.columns() {
            if !union_columns.contains(column) {
                union_columns.push(column.clone());
            }
        }
    }

    let mut combined = RawTable::new(union_columns.clone())?;
    let mut contributions = Vec::with_capacity(tables.len());

    for table in tables {
        let source = table
            .source
            .clone()
            .unwrap_or_else(|| "<unknown>".to_string());
        contributions.push(SourceContribution {
            source,
            rows: table.row_count(),
        });

        // Map the source's column positions onto the union layout once.
        let mapping: Vec<Option<usize>> = union_columns
            .iter()
            .map(|column| table.column_index(column))
            .collect();
        for row in table.rows() {
            let merged: Vec<Option<String>> = mapping
                .iter()
                .map(|slot| slot.and_then(|idx| row[idx].clone()))
                .collect();
            combined.push_row(merged)?;
        }
    }

    let mut dedup_report = CleanReport::default();
    drop_duplicate_rows(&mut combined, &mut dedup_report);

    info!(
        sources = contributions.len(),
        combined_rows = combined.row_count(),
        duplicates_removed = dedup_report.duplicate_rows,
        "consolidated sources"
    );
    Ok((combined, contributions))
}
