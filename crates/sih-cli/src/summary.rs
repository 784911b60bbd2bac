//! Console run summary.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sih_ingest::ColumnMissingness;

use crate::types::RunSummary;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn print_summary(summary: &RunSummary) {
    println!("Input: {}", summary.input_dir.display());
    println!("Store: {}", summary.db_path.display());

    let mut sources = Table::new();
    sources.set_header(vec![
        header_cell("Source"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Cols dropped"),
        header_cell("Rows dropped"),
        header_cell("Duplicates"),
    ]);
    apply_table_style(&mut sources);
    for index in 1..=5 {
        align_column(&mut sources, index, CellAlignment::Right);
    }
    for report in &summary.clean_reports {
        sources.add_row(vec![
            Cell::new(&report.source),
            Cell::new(report.input_rows),
            Cell::new(report.output_rows),
            Cell::new(report.dropped_columns.len()),
            Cell::new(report.dropped_rows),
            Cell::new(report.duplicate_rows),
        ]);
    }
    println!("{sources}");

    let mut load = Table::new();
    load.set_header(vec![header_cell("Stage"), header_cell("Count")]);
    apply_table_style(&mut load);
    align_column(&mut load, 1, CellAlignment::Right);
    load.add_row(vec![
        Cell::new("Combined rows"),
        Cell::new(summary.combined_rows),
    ]);
    load.add_row(vec![
        Cell::new("Admissions"),
        Cell::new(summary.normalize.admissions_inserted),
    ]);
    load.add_row(vec![
        Cell::new("Patients"),
        Cell::new(summary.normalize.patients_created),
    ]);
    load.add_row(vec![
        Cell::new("Establishments"),
        Cell::new(summary.normalize.establishments_created),
    ]);
    load.add_row(vec![
        Cell::new("Placeholders back-filled"),
        Cell::new(summary.placeholders_backfilled),
    ]);
    let skipped = summary.rows_skipped();
    load.add_row(vec![
        if skipped > 0 {
            Cell::new("Rows skipped").fg(Color::Yellow)
        } else {
            Cell::new("Rows skipped")
        },
        Cell::new(skipped),
    ]);
    println!("{load}");

    if let Some(enrich) = &summary.enrich {
        let mut spaces = Table::new();
        spaces.set_header(vec![
            header_cell("Code space"),
            header_cell("Codes"),
            header_cell("Resolved"),
            header_cell("Placeholders"),
        ]);
        apply_table_style(&mut spaces);
        for index in 1..=3 {
            align_column(&mut spaces, index, CellAlignment::Right);
        }
        for space in &enrich.spaces {
            spaces.add_row(vec![
                Cell::new(space.space.to_string()),
                Cell::new(space.codes),
                Cell::new(space.resolved),
                Cell::new(space.placeholders),
            ]);
        }
        println!("{spaces}");
    }

    if skipped > 0 {
        println!("{skipped} row(s) skipped; reasons are in the JSON report (--report).");
    }
    println!("Done in {:.1}s", summary.elapsed_secs);
}

/// Missingness table for `analyze`.
pub fn print_missingness(source: &str, rows: usize, report: &[ColumnMissingness], top: usize) {
    println!("{source}: {rows} rows");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Missing"),
        header_cell("Percent"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in report.iter().take(top) {
        table.add_row(vec![
            Cell::new(&column.column),
            Cell::new(column.missing),
            Cell::new(format!("{:.1}%", column.percent)),
        ]);
    }
    println!("{table}");
}
