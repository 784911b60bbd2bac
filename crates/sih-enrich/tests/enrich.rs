//! Enrichment against an in-memory store.

use sih_enrich::{
    EnrichOptions, ExternalLookup, LookupOutcome, enrich_all, enrich_space, parse_cid10_text,
    parse_procedure_text,
};
use sih_model::{Admission, CodeSpace, Establishment, Patient};
use sih_normalize::{establishment_key, patient_key};
use sih_store::Store;

fn store() -> Store {
    let store = Store::open_in_memory().unwrap();
    store.create_schema().unwrap();
    store
}

fn blank_admission() -> Admission {
    Admission {
        aih_number: None,
        competence_year: None,
        competence_month: None,
        principal_diagnosis: None,
        secondary_diagnosis: None,
        requested_procedure: None,
        performed_procedure: None,
        admission_character: None,
        financing_code: None,
        admission_date: None,
        discharge_date: None,
        stay_days: None,
        icu_days: None,
        icu_marker: None,
        risk_pregnancy: None,
        companion_days: None,
        daily_count: None,
        sequence_number: None,
        batch_code: None,
        source_file: None,
    }
}

fn insert_admission_with_diagnosis(store: &Store, code: &str) {
    let admission = Admission {
        principal_diagnosis: Some(code.to_string()),
        ..blank_admission()
    };
    store.insert_admission(&admission, None, None).unwrap();
}

fn insert_patient_in(store: &Store, municipality: &str) {
    let patient = Patient {
        key: patient_key(Some("40"), Some("1"), Some(municipality), None),
        age: Some(40),
        sex_code: Some("1".into()),
        birth_date: None,
        municipality_code: Some(municipality.to_string()),
        postal_code: None,
        race_code: None,
        nationality_code: None,
    };
    store.insert_patient(&patient).unwrap();
}

struct StaticLookup(&'static str, &'static str);

impl ExternalLookup for StaticLookup {
    fn name(&self) -> &str {
        "static"
    }

    fn lookup(&self, code: &str) -> LookupOutcome {
        if code == self.0 {
            LookupOutcome::Found(self.1.to_string())
        } else {
            LookupOutcome::NotFound
        }
    }
}

/// Always errors; enrichment must degrade to placeholders, not abort.
struct BrokenLookup;

impl ExternalLookup for BrokenLookup {
    fn name(&self) -> &str {
        "broken"
    }

    fn lookup(&self, _code: &str) -> LookupOutcome {
        LookupOutcome::Failed("connection refused".to_string())
    }
}

#[test]
fn unknown_diagnosis_gets_placeholder_never_null() {
    let store = store();
    insert_admission_with_diagnosis(&store, "N390");

    // No CID-10 file, no curated hit, no external capability.
    let report = enrich_space(&store, CodeSpace::Diagnosis, &EnrichOptions::default()).unwrap();
    assert_eq!(report.codes, 1);
    assert_eq!(report.placeholders, 1);

    let description = store
        .code_description(CodeSpace::Diagnosis, "N390")
        .unwrap()
        .unwrap();
    assert_eq!(description, "Diagnóstico N390");

    // The prefix heuristic still classifies it as primary-care sensitive.
    let sensitive: i64 = store
        .connection()
        .query_row(
            "SELECT primary_care_sensitive FROM diagnoses WHERE code = 'N390'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(sensitive, 1);
}

#[test]
fn authoritative_file_wins_over_external() {
    let store = store();
    insert_admission_with_diagnosis(&store, "I10");
    let catalog = parse_cid10_text(
        "CAPÍTULO IX - Doenças do aparelho circulatório\n\
         I10-I15 Doenças hipertensivas\n\
         I10 Hipertensão essencial\n",
    );
    let external = StaticLookup("I10", "from the wire");
    let options = EnrichOptions {
        cid10: Some(catalog),
        external: Some(&external),
        external_delay: std::time::Duration::ZERO,
        ..EnrichOptions::default()
    };
    enrich_space(&store, CodeSpace::Diagnosis, &options).unwrap();
    assert_eq!(
        store.code_description(CodeSpace::Diagnosis, "I10").unwrap(),
        Some("Hipertensão essencial".to_string())
    );
}

#[test]
fn variant_retry_resolves_dirty_diagnosis() {
    let store = store();
    // Subcategory code observed, only the category exists in the catalog.
    insert_admission_with_diagnosis(&store, "I109");
    let catalog = parse_cid10_text("I10 Hipertensão essencial\n");
    let options = EnrichOptions {
        cid10: Some(catalog),
        ..EnrichOptions::default()
    };
    let report = enrich_space(&store, CodeSpace::Diagnosis, &options).unwrap();
    assert_eq!(report.resolved, 1);
    assert_eq!(
        store.code_description(CodeSpace::Diagnosis, "I109").unwrap(),
        Some("Hipertensão essencial".to_string())
    );
}

#[test]
fn municipality_curated_and_variants() {
    let store = store();
    // Six-digit code missing its check digit; curated table has 4106902.
    insert_patient_in(&store, "410690");
    let report =
        enrich_space(&store, CodeSpace::Municipality, &EnrichOptions::default()).unwrap();
    assert_eq!(report.resolved, 1);
    let (name, region): (String, String) = store
        .connection()
        .query_row(
            "SELECT name, region FROM municipalities WHERE code = '410690'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(name, "Curitiba");
    assert_eq!(region, "Paraná");
}

#[test]
fn unknown_parana_municipality_keeps_region_hint() {
    let store = store();
    insert_patient_in(&store, "4199999");
    enrich_space(&store, CodeSpace::Municipality, &EnrichOptions::default()).unwrap();
    let (name, region): (String, String) = store
        .connection()
        .query_row(
            "SELECT name, region FROM municipalities WHERE code = '4199999'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(name, "Município PR 4199999");
    assert_eq!(region, "Paraná (não identificado)");
}

#[test]
fn broken_external_service_never_aborts() {
    let store = store();
    insert_admission_with_diagnosis(&store, "X999");
    let options = EnrichOptions {
        external: Some(&BrokenLookup),
        external_delay: std::time::Duration::ZERO,
        ..EnrichOptions::default()
    };
    let report = enrich_space(&store, CodeSpace::Diagnosis, &options).unwrap();
    assert_eq!(report.placeholders, 1);
    assert!(
        store
            .code_description(CodeSpace::Diagnosis, "X999")
            .unwrap()
            .is_some()
    );
}

#[test]
fn external_lookup_fills_the_gap() {
    let store = store();
    let establishment = Establishment {
        key: establishment_key(Some("123"), Some("11222333000181")),
        cnes: Some("123".into()),
        tax_id: Some("11222333000181".into()),
        parent_tax_id: None,
        municipality_code: None,
        specialty_code: None,
        legal_nature_code: None,
        management_code: None,
        complexity_code: None,
    };
    store.insert_establishment(&establishment).unwrap();

    let external = StaticLookup("11222333000181", "Hospital Regional do Litoral");
    let options = EnrichOptions {
        external: Some(&external),
        external_delay: std::time::Duration::ZERO,
        ..EnrichOptions::default()
    };
    let report = enrich_space(&store, CodeSpace::Establishment, &options).unwrap();
    assert_eq!(report.resolved, 1);
    assert_eq!(
        store
            .code_description(CodeSpace::Establishment, "11222333000181")
            .unwrap(),
        Some("Hospital Regional do Litoral".to_string())
    );
}

#[test]
fn procedure_file_then_classification() {
    let store = store();
    let admission = Admission {
        requested_procedure: Some("0310010039".into()),
        performed_procedure: Some("0201099999".into()),
        ..blank_admission()
    };
    store.insert_admission(&admission, None, None).unwrap();

    let catalog = parse_procedure_text("0310010039PARTO NORMAL  030402070001\n");
    let options = EnrichOptions {
        procedures: Some(catalog),
        ..EnrichOptions::default()
    };
    let report = enrich_space(&store, CodeSpace::Procedure, &options).unwrap();
    assert_eq!(report.codes, 2);
    assert_eq!(report.resolved, 1);
    assert_eq!(report.placeholders, 1);

    assert_eq!(
        store
            .code_description(CodeSpace::Procedure, "0310010039")
            .unwrap(),
        Some("PARTO NORMAL".to_string())
    );
    // The transplant-range code got a placeholder plus its prefix group.
    let (description, group): (String, String) = store
        .connection()
        .query_row(
            "SELECT description, procedure_group FROM procedures WHERE code = '0201099999'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(description, "Procedimento 0201099999");
    assert_eq!(group, "Transplantes");
}

#[test]
fn zero_unresolved_codes_after_enrich_all() {
    let store = store();
    let admission = Admission {
        principal_diagnosis: Some("A09".into()),
        secondary_diagnosis: Some("ZZZ9".into()),
        requested_procedure: Some("0301060088".into()),
        ..blank_admission()
    };
    store.insert_admission(&admission, None, None).unwrap();
    insert_patient_in(&store, "4106902");
    insert_patient_in(&store, "123");

    let count_observed: usize = 4; // A09, ZZZ9, 0301060088 handled per space below

    let report = enrich_all(&store, &EnrichOptions::default()).unwrap();
    assert!(report.total_codes() >= count_observed);

    for space in [
        CodeSpace::Diagnosis,
        CodeSpace::Municipality,
        CodeSpace::Procedure,
        CodeSpace::Establishment,
    ] {
        for code in store.observed_codes(space).unwrap() {
            let description = store.code_description(space, &code).unwrap();
            assert!(
                description.is_some(),
                "unresolved {space} code {code}"
            );
        }
    }
}
