//! Placeholder back-fill for observed codes.
//!
//! After loading, every diagnosis, procedure, and municipality code seen
//! in the entity tables gets at least a generated description, so the
//! dashboard's joins always resolve. The enricher later overwrites these
//! placeholders wherever a real description can be found.

use tracing::info;

use sih_store::{Result, Store};

/// Inserts `"<EntityKind> <code>"` rows for codes with no description yet.
/// Returns the number of placeholder rows created.
pub fn backfill_placeholders(store: &Store) -> Result<usize> {
    let conn = store.connection();
    let mut created = 0usize;

    created += conn.execute(
        "INSERT OR IGNORE INTO diagnoses (code, description)
         SELECT DISTINCT principal_diagnosis, 'Diagnóstico ' || principal_diagnosis
         FROM admissions WHERE principal_diagnosis IS NOT NULL",
        [],
    )?;
    created += conn.execute(
        "INSERT OR IGNORE INTO diagnoses (code, description)
         SELECT DISTINCT secondary_diagnosis, 'Diagnóstico ' || secondary_diagnosis
         FROM admissions WHERE secondary_diagnosis IS NOT NULL",
        [],
    )?;

    created += conn.execute(
        "INSERT OR IGNORE INTO procedures (code, description)
         SELECT DISTINCT requested_procedure, 'Procedimento ' || requested_procedure
         FROM admissions WHERE requested_procedure IS NOT NULL",
        [],
    )?;
    created += conn.execute(
        "INSERT OR IGNORE INTO procedures (code, description)
         SELECT DISTINCT performed_procedure, 'Procedimento ' || performed_procedure
         FROM admissions WHERE performed_procedure IS NOT NULL",
        [],
    )?;

    created += conn.execute(
        "INSERT OR IGNORE INTO municipalities (code, name)
         SELECT DISTINCT municipality_code, 'Município ' || municipality_code
         FROM patients WHERE municipality_code IS NOT NULL",
        [],
    )?;
    created += conn.execute(
        "INSERT OR IGNORE INTO municipalities (code, name)
         SELECT DISTINCT municipality_code, 'Município ' || municipality_code
         FROM establishments WHERE municipality_code IS NOT NULL",
        [],
    )?;

    info!(created, "back-filled placeholder descriptions");
    Ok(created)
}
