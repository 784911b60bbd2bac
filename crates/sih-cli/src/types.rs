//! Result types shared by the pipeline, summary, and report modules.

use std::path::PathBuf;

use serde::Serialize;

use sih_enrich::EnrichReport;
use sih_ingest::{CleanReport, SourceContribution};
use sih_normalize::NormalizeReport;

/// Everything one `run` produced, for the console summary and the JSON
/// report.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub input_dir: PathBuf,
    pub db_path: PathBuf,
    pub ingest_errors: Vec<String>,
    pub clean_reports: Vec<CleanReport>,
    pub contributions: Vec<SourceContribution>,
    pub combined_rows: usize,
    pub normalize: NormalizeReport,
    pub placeholders_backfilled: usize,
    pub enrich: Option<EnrichReport>,
    pub elapsed_secs: f64,
}

impl RunSummary {
    /// Rows that reached the combined table but were skipped at load.
    pub fn rows_skipped(&self) -> usize {
        self.normalize.rows_skipped()
    }
}
