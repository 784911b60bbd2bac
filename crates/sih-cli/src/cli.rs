//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sih-etl",
    version,
    about = "SIH/SUS admission ETL - clean, normalize and enrich hospital admission extracts",
    long_about = "Load monthly SIH/SUS RD extracts (CSV) into a normalized SQLite store.\n\n\
                  The pipeline cleans each monthly file, consolidates them, splits rows\n\
                  into patients, establishments, admissions and financial values, and\n\
                  resolves diagnosis, municipality, procedure and establishment codes\n\
                  to human-readable descriptions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline: clean, consolidate, load, enrich.
    Run(RunArgs),

    /// Report per-column missingness for each input file, without loading.
    Analyze(AnalyzeArgs),

    /// Re-run reference enrichment against an existing store.
    Enrich(EnrichArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory containing the monthly RD CSV extracts.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// SQLite store path (default: <INPUT_DIR>/internacoes_datasus.db).
    #[arg(long = "db", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// CID-10 reference text file. Falls back to
    /// $SIH_REFERENCE_DIR/cid10_ultimaversaodisponivel_2012.txt.
    #[arg(long = "cid10", value_name = "PATH")]
    pub cid10: Option<PathBuf>,

    /// SUS procedure table (fixed-width tb_procedimento export). Falls
    /// back to $SIH_REFERENCE_DIR/tb_procedimento.txt.
    #[arg(long = "procedure-table", value_name = "PATH")]
    pub procedure_table: Option<PathBuf>,

    /// Write a JSON run report to this path.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Skip the reference enrichment stage.
    #[arg(long = "no-enrich")]
    pub no_enrich: bool,

    /// Load into the existing store without recreating the schema.
    ///
    /// Entity keys are only deduplicated within one run, so loading the
    /// same extract twice this way duplicates patients and
    /// establishments. The default (recreate) keeps `run` idempotent.
    #[arg(long = "keep-existing")]
    pub keep_existing: bool,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// A CSV file or a directory of CSV files.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// How many columns to list per file, worst first.
    #[arg(long = "top", default_value_t = 10)]
    pub top: usize,
}

#[derive(Parser)]
pub struct EnrichArgs {
    /// Existing SQLite store produced by `run`.
    #[arg(value_name = "DB_PATH")]
    pub db: PathBuf,

    /// CID-10 reference text file.
    #[arg(long = "cid10", value_name = "PATH")]
    pub cid10: Option<PathBuf>,

    /// SUS procedure table file.
    #[arg(long = "procedure-table", value_name = "PATH")]
    pub procedure_table: Option<PathBuf>,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
