//! The staged pipeline behind `run`.
//!
//! Stages in order, each taking the previous stage's typed output:
//! 1. **Ingest**: discover and decode the monthly CSV files
//! 2. **Clean**: per-file missingness diagnostic and cleansing
//! 3. **Consolidate**: union columns, concatenate, re-deduplicate
//! 4. **Load**: normalize rows into the store with checkpointed commits
//! 5. **Enrich**: resolve reference codes through the strategy chain
//! 6. **Report**: metadata upsert and run summary
//!
//! Structural problems (missing input directory, no readable file,
//! unopenable store) abort with an error; everything else degrades to
//! counted skips inside the stage reports.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, warn};

use sih_enrich::{EnrichOptions, EnrichReport, enrich_all, parse_cid10_file, load_procedure_file};
use sih_ingest::{
    CleanReport, SourceContribution, analyze_missing, clean, consolidate, list_csv_files,
    read_csv_table,
};
use sih_model::RawTable;
use sih_normalize::{NormalizeReport, Normalizer, backfill_placeholders};
use sih_store::Store;

use crate::cli::RunArgs;
use crate::types::RunSummary;

/// Environment variable pointing at the reference-file directory.
pub const REFERENCE_DIR_ENV: &str = "SIH_REFERENCE_DIR";

const CID10_FILE_NAME: &str = "cid10_ultimaversaodisponivel_2012.txt";
const PROCEDURE_FILE_NAME: &str = "tb_procedimento.txt";

/// Stage 1: discover and read every monthly CSV file.
pub struct IngestResult {
    pub tables: Vec<RawTable>,
    pub errors: Vec<String>,
}

pub fn ingest(input_dir: &Path) -> Result<IngestResult> {
    let files = list_csv_files(input_dir).context("list input files")?;
    if files.is_empty() {
        bail!("no CSV files found in {}", input_dir.display());
    }

    let mut tables = Vec::new();
    let mut errors = Vec::new();
    for path in &files {
        match read_csv_table(path) {
            Ok(table) => {
                info!(
                    file = %path.display(),
                    rows = table.row_count(),
                    columns = table.column_count(),
                    "ingested"
                );
                tables.push(table);
            }
            Err(error) => {
                warn!(file = %path.display(), %error, "skipping unreadable file");
                errors.push(format!("{}: {error}", path.display()));
            }
        }
    }
    if tables.is_empty() {
        bail!("none of the {} input files could be read", files.len());
    }
    Ok(IngestResult { tables, errors })
}

/// Stage 2: per-file diagnostic and cleansing.
pub fn clean_stage(tables: Vec<RawTable>) -> Result<(Vec<RawTable>, Vec<CleanReport>)> {
    let mut cleaned = Vec::with_capacity(tables.len());
    let mut reports = Vec::with_capacity(tables.len());
    for table in tables {
        let source = table.source.clone().unwrap_or_else(|| "<stdin>".to_string());
        let span = info_span!("clean", source = %source);
        let _guard = span.enter();

        for column in analyze_missing(&table).iter().take(10) {
            tracing::debug!(
                column = %column.column,
                missing = column.missing,
                percent = %format!("{:.1}", column.percent),
                "missingness"
            );
        }

        let (table, report) = clean(table, &source)?;
        cleaned.push(table);
        reports.push(report);
    }
    Ok((cleaned, reports))
}

/// Stage 3: one combined table.
pub fn consolidate_stage(
    tables: Vec<RawTable>,
) -> Result<(RawTable, Vec<SourceContribution>)> {
    Ok(consolidate(tables)?)
}

/// Stage 4: normalize into the store.
pub fn load_stage(store: &Store, combined: &RawTable) -> Result<(NormalizeReport, usize)> {
    let bar = ProgressBar::new(combined.row_count() as u64);
    bar.set_style(ProgressStyle::default_bar());
    let mut normalizer = Normalizer::new(store);
    let report = normalizer
        .normalize_with_progress(combined, |rows_done| bar.set_position(rows_done as u64))
        .context("normalize combined table")?;
    bar.finish_and_clear();

    let backfilled = backfill_placeholders(store).context("back-fill placeholder codes")?;
    Ok((report, backfilled))
}

/// Resolves a reference file: explicit flag, then the reference
/// directory from the environment. Missing references downgrade to a
/// log line — enrichment still terminates through fallbacks.
fn resolve_reference(explicit: Option<&Path>, file_name: &str) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let dir = std::env::var_os(REFERENCE_DIR_ENV)?;
    let candidate = PathBuf::from(dir).join(file_name);
    candidate.exists().then_some(candidate)
}

/// Stage 5: reference enrichment. Reference files that are configured
/// but unreadable are structural; absent ones are skipped.
pub fn enrich_stage(
    store: &Store,
    cid10: Option<&Path>,
    procedure_table: Option<&Path>,
) -> Result<EnrichReport> {
    let cid10_catalog = match resolve_reference(cid10, CID10_FILE_NAME) {
        Some(path) => Some(parse_cid10_file(&path).context("parse CID-10 reference")?),
        None => {
            info!("no CID-10 reference available, diagnosis descriptions fall back");
            None
        }
    };
    let procedure_catalog = match resolve_reference(procedure_table, PROCEDURE_FILE_NAME) {
        Some(path) => Some(load_procedure_file(&path).context("parse procedure table")?),
        None => None,
    };

    let options = EnrichOptions {
        cid10: cid10_catalog,
        procedures: procedure_catalog,
        ..EnrichOptions::default()
    };
    Ok(enrich_all(store, &options)?)
}

/// Runs the whole pipeline for `run`.
pub fn run_pipeline(args: &RunArgs) -> Result<RunSummary> {
    let started = Instant::now();
    let input_dir = &args.input_dir;
    let db_path = args
        .db
        .clone()
        .unwrap_or_else(|| input_dir.join("internacoes_datasus.db"));

    let span = info_span!("run", input = %input_dir.display());
    let _guard = span.enter();

    let ingested = ingest(input_dir)?;
    let ingest_errors = ingested.errors;
    let (cleaned, clean_reports) = clean_stage(ingested.tables)?;
    let (combined, contributions) = consolidate_stage(cleaned)?;
    let combined_rows = combined.row_count();

    let store = Store::open(&db_path).context("open output store")?;
    if args.keep_existing {
        store.create_schema().context("create schema")?;
    } else {
        store.recreate_schema().context("recreate schema")?;
    }

    let (normalize, placeholders_backfilled) = load_stage(&store, &combined)?;

    let enrich = if args.no_enrich {
        None
    } else {
        Some(enrich_stage(
            &store,
            args.cid10.as_deref(),
            args.procedure_table.as_deref(),
        )?)
    };

    store
        .update_all_metadata(&input_dir.display().to_string())
        .context("update metadata")?;

    Ok(RunSummary {
        input_dir: input_dir.clone(),
        db_path,
        ingest_errors,
        clean_reports,
        contributions,
        combined_rows,
        normalize,
        placeholders_backfilled,
        enrich,
        elapsed_secs: started.elapsed().as_secs_f64(),
    })
}

/// Runs enrichment alone against an existing store.
pub fn run_enrich(
    db: &Path,
    cid10: Option<&Path>,
    procedure_table: Option<&Path>,
) -> Result<EnrichReport> {
    if !db.exists() {
        bail!("store not found: {} (run the pipeline first)", db.display());
    }
    let store = Store::open(db).context("open store")?;
    store.create_schema().context("ensure schema")?;
    let report = enrich_stage(&store, cid10, procedure_table)?;
    store
        .update_all_metadata(&db.display().to_string())
        .context("update metadata")?;
    Ok(report)
}
