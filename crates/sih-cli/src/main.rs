//! SIH/SUS admission ETL CLI.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};

use sih_cli::cli::{AnalyzeArgs, Cli, Command, LogFormatArg};
use sih_cli::logging::{LogConfig, LogFormat, init_logging};
use sih_cli::pipeline::{run_enrich, run_pipeline};
use sih_cli::report::write_run_report;
use sih_cli::summary::{print_missingness, print_summary};

use sih_ingest::{analyze_missing, list_csv_files, read_csv_table};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Run(args) => match run_pipeline(args) {
            Ok(summary) => {
                if let Some(path) = &args.report
                    && let Err(error) = write_run_report(path, &summary)
                {
                    eprintln!("error: {error:#}");
                }
                print_summary(&summary);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Analyze(args) => match run_analyze(args) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Enrich(args) => {
            match run_enrich(&args.db, args.cid10.as_deref(), args.procedure_table.as_deref()) {
                Ok(report) => {
                    println!(
                        "Enriched {} codes across {} spaces ({} resolved).",
                        report.total_codes(),
                        report.spaces.len(),
                        report.total_resolved()
                    );
                    0
                }
                Err(error) => {
                    eprintln!("error: {error:#}");
                    1
                }
            }
        }
    };
    std::process::exit(exit_code);
}

fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<()> {
    let files = if args.input.is_dir() {
        list_csv_files(&args.input)?
    } else {
        vec![args.input.clone()]
    };
    for path in files {
        let table = read_csv_table(&path)?;
        let report = analyze_missing(&table);
        let source = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("<input>");
        print_missingness(source, table.row_count(), &report, args.top);
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !cli.verbosity.is_present();
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
