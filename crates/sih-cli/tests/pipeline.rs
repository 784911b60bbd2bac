//! Full-pipeline test over a temporary study directory.

use std::path::PathBuf;

use sih_cli::cli::RunArgs;
use sih_cli::pipeline::run_pipeline;
use sih_model::CodeSpace;
use sih_store::Store;

const JAN: &str = "\
N_AIH,ANO_CMPT,MES_CMPT,IDADE,SEXO,MUNIC_RES,DIAG_PRINC,PROC_REA,CGC_HOSP,CNES,VAL_SH,VAL_TOT
4125100000001,2025,1,45,1,4106902,N390,0303010037,78143153000185,0015423,100.00,150.00
4125100000002,2025,1,45,1,4106902,I10,0303010037,78143153000185,0015423,200.00,250.00
4125100000002,2025,1,45,1,4106902,I10,0303010037,78143153000185,0015423,200.00,250.00
";

const FEB: &str = "\
N_AIH,ANO_CMPT,MES_CMPT,IDADE,SEXO,MUNIC_RES,DIAG_PRINC,PROC_REA,CGC_HOSP,CNES,VAL_SH,VAL_TOT,MORTE
4125100000003,2025,2,0,0,0000000,J180,0303010037,78143153000185,0015423,300.00,,0
";

fn write_inputs() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("RDPR2501.csv"), JAN).unwrap();
    std::fs::write(dir.path().join("RDPR2502.csv"), FEB).unwrap();
    dir
}

fn run_args(dir: &tempfile::TempDir) -> RunArgs {
    RunArgs {
        input_dir: dir.path().to_path_buf(),
        db: Some(dir.path().join("out.db")),
        cid10: None,
        procedure_table: None,
        report: Some(dir.path().join("report.json")),
        no_enrich: false,
        keep_existing: false,
    }
}

#[test]
fn pipeline_loads_and_enriches() {
    let dir = write_inputs();
    let args = run_args(&dir);
    let summary = run_pipeline(&args).unwrap();

    // January had one exact duplicate row.
    assert_eq!(summary.clean_reports.len(), 2);
    assert_eq!(summary.clean_reports[0].duplicate_rows, 1);
    // 2 surviving January rows + 1 February row.
    assert_eq!(summary.combined_rows, 3);
    assert_eq!(summary.normalize.admissions_inserted, 3);
    // January rows share demographics → one patient; February differs.
    assert_eq!(summary.normalize.patients_created, 2);
    assert_eq!(summary.normalize.establishments_created, 1);
    assert_eq!(summary.rows_skipped(), 0);

    let store = Store::open(&args.db.clone().unwrap()).unwrap();
    assert_eq!(store.table_count("admissions").unwrap(), 3);
    assert_eq!(store.table_count("financial_values").unwrap(), 3);

    // Every observed code resolved to something.
    for space in [
        CodeSpace::Diagnosis,
        CodeSpace::Municipality,
        CodeSpace::Procedure,
        CodeSpace::Establishment,
    ] {
        for code in store.observed_codes(space).unwrap() {
            assert!(store.code_description(space, &code).unwrap().is_some());
        }
    }

    // The curated table knows this hospital and this municipality.
    assert_eq!(
        store
            .code_description(CodeSpace::Establishment, "78143153000185")
            .unwrap(),
        Some("Hospital das Clínicas da UFPR".to_string())
    );
    assert_eq!(
        store
            .code_description(CodeSpace::Municipality, "4106902")
            .unwrap(),
        Some("Curitiba".to_string())
    );

    // Absent VAL_TOT loaded as zero, not null.
    let feb_total: f64 = store
        .connection()
        .query_row(
            "SELECT f.total FROM financial_values f
             JOIN admissions a ON a.id = f.admission_id
             WHERE a.aih_number = '4125100000003'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(feb_total, 0.0);

    // Metadata recorded per logical table.
    let tracked: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM metadata", [], |row| row.get(0))
        .unwrap();
    assert_eq!(tracked as usize, Store::tracked_tables().len());
}

#[test]
fn rerun_recreates_schema_and_stays_idempotent() {
    let dir = write_inputs();
    let args = run_args(&dir);
    run_pipeline(&args).unwrap();
    let summary = run_pipeline(&args).unwrap();
    let store = Store::open(&args.db.clone().unwrap()).unwrap();
    assert_eq!(store.table_count("admissions").unwrap(), 3);
    assert_eq!(store.table_count("patients").unwrap(), 2);
    assert_eq!(summary.normalize.admissions_inserted, 3);
}

#[test]
fn missing_input_dir_is_structural() {
    let args = RunArgs {
        input_dir: PathBuf::from("/nonexistent-sih-data"),
        db: None,
        cid10: None,
        procedure_table: None,
        report: None,
        no_enrich: true,
        keep_existing: false,
    };
    assert!(run_pipeline(&args).is_err());
}

#[test]
fn cid10_reference_feeds_diagnosis_descriptions() {
    let dir = write_inputs();
    let cid10 = dir.path().join("cid10.txt");
    std::fs::write(
        &cid10,
        "CAPÍTULO X - Doenças do aparelho respiratório\n\
         J09-J18 Influenza e pneumonia\n\
         J18.0 Broncopneumonia não especificada\n",
    )
    .unwrap();
    let mut args = run_args(&dir);
    args.cid10 = Some(cid10);
    run_pipeline(&args).unwrap();

    let store = Store::open(&args.db.clone().unwrap()).unwrap();
    assert_eq!(
        store.code_description(CodeSpace::Diagnosis, "J180").unwrap(),
        Some("Broncopneumonia não especificada".to_string())
    );
}
