use std::collections::HashMap;

use crate::error::{ModelError, Result};

/// An in-memory table of raw textual cells.
///
/// Cells are `None` once a value has been recognized as missing (true
/// null, empty string, or a zero-run sentinel). Column order is
/// preserved from the source file; rows are positional against
/// `columns`.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    /// Name of the originating file, when known.
    pub source: Option<String>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.iter().any(|c| c.trim().is_empty()) {
            return Err(ModelError::EmptyColumnName);
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
            source: None,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut Vec<Vec<Option<String>>> {
        &mut self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Vec<Option<String>>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ModelError::RowWidth {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Positional index of every column, for repeated row lookups.
    pub fn column_indices(&self) -> HashMap<&str, usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect()
    }

    /// Cell value at (row, column name); `None` when the column is absent
    /// or the cell is null.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Appends a column filled with `value` on every existing row.
    pub fn push_column(&mut self, name: impl Into<String>, value: Option<String>) {
        self.columns.push(name.into());
        for row in &mut self.rows {
            row.push(value.clone());
        }
    }

    /// Drops the named columns, keeping relative order of the rest.
    pub fn drop_columns(&mut self, names: &[String]) {
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !names.contains(c))
            .map(|(idx, _)| idx)
            .collect();
        self.columns = keep.iter().map(|&idx| self.columns[idx].clone()).collect();
        for row in &mut self.rows {
            *row = keep.iter().map(|&idx| row[idx].take()).collect();
        }
    }
}
