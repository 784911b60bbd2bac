//! Machine-readable run report.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::types::RunSummary;

/// Writes the run summary as pretty-printed JSON.
pub fn write_run_report(path: &Path, summary: &RunSummary) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("create report file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .with_context(|| format!("write report {}", path.display()))?;
    info!(path = %path.display(), "run report written");
    Ok(())
}
