//! CSV parsing into [`RawTable`].

use std::path::Path;

use sih_model::RawTable;

use crate::encoding::read_text_file;
use crate::error::Result;

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_uppercase()
}

/// Reads a CSV file into a [`RawTable`], decoding the file encoding first
/// and tagging the table with the file name.
pub fn read_csv_table(path: &Path) -> Result<RawTable> {
    let text = read_text_file(path)?;
    let mut table = read_csv_str(&text)?;
    table.source = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(String::from);
    Ok(table)
}

/// Parses CSV text into a [`RawTable`].
///
/// Headers are upper-cased the way the government column codes are
/// defined. Cells are trimmed; empty cells come through as empty strings
/// here — sentinel recognition happens in the cleanser, not the reader.
pub fn read_csv_str(text: &str) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();
    let width = headers.len();
    let mut table = RawTable::new(headers)?;

    for record in reader.records() {
        let record = record?;
        let mut row: Vec<Option<String>> = record
            .iter()
            .take(width)
            .map(|cell| Some(cell.trim().to_string()))
            .collect();
        // Short records (ragged exports) pad out with nulls.
        row.resize(width, None);
        table.push_row(row)?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headers_uppercase() {
        let table = read_csv_str("n_aih,idade\n123,45\n").unwrap();
        assert_eq!(table.columns(), &["N_AIH".to_string(), "IDADE".to_string()]);
        assert_eq!(table.cell(0, "IDADE"), Some("45"));
    }

    #[test]
    fn pads_short_rows() {
        let table = read_csv_str("A,B,C\n1,2\n").unwrap();
        assert_eq!(table.cell(0, "A"), Some("1"));
        assert_eq!(table.cell(0, "C"), None);
    }

    #[test]
    fn trims_cells() {
        let table = read_csv_str("A,B\n 1 , x y \n").unwrap();
        assert_eq!(table.cell(0, "A"), Some("1"));
        assert_eq!(table.cell(0, "B"), Some("x y"));
    }
}
