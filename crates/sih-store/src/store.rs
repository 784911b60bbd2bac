//! Repository layer over the SQLite store.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

use sih_model::{Admission, CodeSpace, Establishment, FinancialValues, Patient};

use crate::error::{Result, StoreError};
use crate::schema;

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) the store file.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// In-memory store, for tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Creates all tables and seeds the small fixed vocabularies.
    pub fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(schema::CREATE_TABLES)?;
        self.conn.execute_batch(schema::SEED_CODES)?;
        Ok(())
    }

    /// Drops and recreates everything. `run` starts here so a full run is
    /// idempotent; entity keys are only unique within one load.
    pub fn recreate_schema(&self) -> Result<()> {
        self.conn.execute_batch(schema::DROP_TABLES)?;
        self.create_schema()
    }

    /// Starts a checkpointable write batch.
    pub fn begin(&self) -> Result<()> {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(())
    }

    /// Commits the current write batch.
    pub fn commit(&self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    pub fn insert_patient(&self, patient: &Patient) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO patients (composite_key, age, sex_code, birth_date,
                 municipality_code, postal_code, race_code, nationality_code)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                patient.key.to_hex(),
                patient.age,
                patient.sex_code,
                patient.birth_date,
                patient.municipality_code,
                patient.postal_code,
                patient.race_code,
                patient.nationality_code,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_establishment(&self, establishment: &Establishment) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO establishments (composite_key, cnes, tax_id, parent_tax_id,
                 municipality_code, specialty_code, legal_nature_code,
                 management_code, complexity_code)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                establishment.key.to_hex(),
                establishment.cnes,
                establishment.tax_id,
                establishment.parent_tax_id,
                establishment.municipality_code,
                establishment.specialty_code,
                establishment.legal_nature_code,
                establishment.management_code,
                establishment.complexity_code,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_admission(
        &self,
        admission: &Admission,
        patient_id: Option<i64>,
        establishment_id: Option<i64>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO admissions (aih_number, competence_year, competence_month,
                 patient_id, establishment_id, principal_diagnosis, secondary_diagnosis,
                 requested_procedure, performed_procedure, admission_character,
                 financing_code, admission_date, discharge_date, stay_days, icu_days,
                 icu_marker, risk_pregnancy, companion_days, daily_count,
                 sequence_number, batch_code, source_file)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                 ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22)",
            params![
                admission.aih_number,
                admission.competence_year,
                admission.competence_month,
                patient_id,
                establishment_id,
                admission.principal_diagnosis,
                admission.secondary_diagnosis,
                admission.requested_procedure,
                admission.performed_procedure,
                admission.admission_character,
                admission.financing_code,
                admission.admission_date,
                admission.discharge_date,
                admission.stay_days,
                admission.icu_days,
                admission.icu_marker,
                admission.risk_pregnancy,
                admission.companion_days,
                admission.daily_count,
                admission.sequence_number,
                admission.batch_code,
                admission.source_file,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_financial_values(
        &self,
        admission_id: i64,
        values: &FinancialValues,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO financial_values (admission_id, hospital_services,
                 professional_services, diagnostics, diagnostics_no_split, newborn,
                 companion, prosthesis, blood, transport, obstetric, pediatric, icu,
                 intermediate_care, hospital_services_federal,
                 professional_services_federal, hospital_services_manager,
                 professional_services_manager, total, foreign_currency_total)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                 ?15, ?16, ?17, ?18, ?19, ?20)",
            params![
                admission_id,
                values.hospital_services,
                values.professional_services,
                values.diagnostics,
                values.diagnostics_no_split,
                values.newborn,
                values.companion,
                values.prosthesis,
                values.blood,
                values.transport,
                values.obstetric,
                values.pediatric,
                values.icu,
                values.intermediate_care,
                values.hospital_services_federal,
                values.professional_services_federal,
                values.hospital_services_manager,
                values.professional_services_manager,
                values.total,
                values.foreign_currency_total,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Inserts a code description only when the code is new.
    pub fn insert_code_if_absent(&self, space: CodeSpace, code: &str, description: &str) -> Result<bool> {
        let changed = match space {
            CodeSpace::Diagnosis => self.conn.execute(
                "INSERT OR IGNORE INTO diagnoses (code, description) VALUES (?1, ?2)",
                params![code, description],
            )?,
            CodeSpace::Municipality => self.conn.execute(
                "INSERT OR IGNORE INTO municipalities (code, name) VALUES (?1, ?2)",
                params![code, description],
            )?,
            CodeSpace::Procedure => self.conn.execute(
                "INSERT OR IGNORE INTO procedures (code, description) VALUES (?1, ?2)",
                params![code, description],
            )?,
            CodeSpace::Establishment => self.conn.execute(
                "INSERT OR IGNORE INTO establishment_names (tax_id, legal_name) VALUES (?1, ?2)",
                params![code, description],
            )?,
        };
        Ok(changed > 0)
    }

    pub fn upsert_diagnosis(
        &self,
        code: &str,
        description: &str,
        chapter: &str,
        group: &str,
        sensitive: bool,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO diagnoses (code, description, chapter, disease_group, primary_care_sensitive)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(code) DO UPDATE SET
                 description = excluded.description,
                 chapter = excluded.chapter,
                 disease_group = excluded.disease_group,
                 primary_care_sensitive = excluded.primary_care_sensitive",
            params![code, description, chapter, group, sensitive as i64],
        )?;
        Ok(())
    }

    pub fn upsert_municipality(&self, code: &str, name: &str, region: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO municipalities (code, name, region) VALUES (?1, ?2, ?3)
             ON CONFLICT(code) DO UPDATE SET
                 name = excluded.name,
                 region = excluded.region",
            params![code, name, region],
        )?;
        Ok(())
    }

    pub fn upsert_procedure(&self, code: &str, description: &str, group: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO procedures (code, description, procedure_group) VALUES (?1, ?2, ?3)
             ON CONFLICT(code) DO UPDATE SET
                 description = excluded.description,
                 procedure_group = excluded.procedure_group",
            params![code, description, group],
        )?;
        Ok(())
    }

    pub fn upsert_establishment_name(&self, tax_id: &str, name: &str, kind: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO establishment_names (tax_id, legal_name, establishment_kind)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(tax_id) DO UPDATE SET
                 legal_name = excluded.legal_name,
                 establishment_kind = excluded.establishment_kind",
            params![tax_id, name, kind],
        )?;
        Ok(())
    }

    /// Distinct codes observed in the entity tables for one code space,
    /// in the order the store returns them.
    pub fn observed_codes(&self, space: CodeSpace) -> Result<Vec<String>> {
        let sql = match space {
            CodeSpace::Diagnosis => {
                "SELECT DISTINCT principal_diagnosis FROM admissions
                     WHERE principal_diagnosis IS NOT NULL
                 UNION
                 SELECT DISTINCT secondary_diagnosis FROM admissions
                     WHERE secondary_diagnosis IS NOT NULL"
            }
            CodeSpace::Municipality => {
                "SELECT DISTINCT municipality_code FROM patients
                     WHERE municipality_code IS NOT NULL
                 UNION
                 SELECT DISTINCT municipality_code FROM establishments
                     WHERE municipality_code IS NOT NULL"
            }
            CodeSpace::Procedure => {
                "SELECT DISTINCT requested_procedure FROM admissions
                     WHERE requested_procedure IS NOT NULL
                 UNION
                 SELECT DISTINCT performed_procedure FROM admissions
                     WHERE performed_procedure IS NOT NULL"
            }
            CodeSpace::Establishment => {
                "SELECT DISTINCT tax_id FROM establishments WHERE tax_id IS NOT NULL"
            }
        };
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut codes = Vec::new();
        for code in rows {
            codes.push(code?);
        }
        Ok(codes)
    }

    /// Description currently stored for a code, if any.
    pub fn code_description(&self, space: CodeSpace, code: &str) -> Result<Option<String>> {
        let sql = match space {
            CodeSpace::Diagnosis => "SELECT description FROM diagnoses WHERE code = ?1",
            CodeSpace::Municipality => "SELECT name FROM municipalities WHERE code = ?1",
            CodeSpace::Procedure => "SELECT description FROM procedures WHERE code = ?1",
            CodeSpace::Establishment => {
                "SELECT legal_name FROM establishment_names WHERE tax_id = ?1"
            }
        };
        let description = self
            .conn
            .query_row(sql, params![code], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(description)
    }

    pub fn table_count(&self, table: &str) -> Result<i64> {
        // Table names come from the fixed schema list, never user input.
        let sql = format!("SELECT COUNT(*) FROM {table}");
        let count = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }

    /// Upserts the per-table row-count record kept for the dashboard.
    pub fn update_metadata(&self, table: &str, source_path: &str) -> Result<()> {
        let count = self.table_count(table)?;
        self.conn.execute(
            "INSERT INTO metadata (table_name, row_count, source_path, updated_at)
             VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT(table_name) DO UPDATE SET
                 row_count = excluded.row_count,
                 source_path = excluded.source_path,
                 updated_at = excluded.updated_at",
            params![table, count, source_path],
        )?;
        Ok(())
    }

    /// Logical tables tracked in `metadata`.
    pub fn tracked_tables() -> &'static [&'static str] {
        &[
            "patients",
            "establishments",
            "admissions",
            "financial_values",
            "diagnoses",
            "municipalities",
            "procedures",
            "establishment_names",
        ]
    }

    pub fn update_all_metadata(&self, source_path: &str) -> Result<()> {
        for table in Self::tracked_tables() {
            self.update_metadata(table, source_path)?;
        }
        info!(source = source_path, "metadata refreshed");
        Ok(())
    }

    /// Escape hatch for callers composing their own read queries
    /// (back-fill SQL, tests).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sih_model::EntityKey;

    fn store() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.create_schema().unwrap();
        store
    }

    fn patient() -> Patient {
        Patient {
            key: EntityKey::derive(&["45", "1", "4106902", "1980-01-01"]),
            age: Some(45),
            sex_code: Some("1".into()),
            birth_date: Some("1980-01-01".into()),
            municipality_code: Some("4106902".into()),
            postal_code: None,
            race_code: None,
            nationality_code: None,
        }
    }

    #[test]
    fn file_store_recreates_from_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("internacoes.db");
        let store = Store::open(&path).unwrap();
        store.create_schema().unwrap();
        store.insert_patient(&patient()).unwrap();
        assert_eq!(store.table_count("patients").unwrap(), 1);

        store.recreate_schema().unwrap();
        assert_eq!(store.table_count("patients").unwrap(), 0);
        // Seeds are back after recreation.
        assert!(store.table_count("sex_codes").unwrap() >= 3);
    }

    #[test]
    fn schema_creates_and_seeds() {
        let store = store();
        assert!(store.table_count("patients").unwrap() == 0);
        assert!(store.table_count("sex_codes").unwrap() >= 3);
        assert!(store.table_count("admission_character_codes").unwrap() >= 6);
    }

    #[test]
    fn patient_roundtrip() {
        let store = store();
        let id = store.insert_patient(&patient()).unwrap();
        assert_eq!(id, 1);
        assert_eq!(store.table_count("patients").unwrap(), 1);
    }

    #[test]
    fn metadata_upsert_overwrites() {
        let store = store();
        store.insert_patient(&patient()).unwrap();
        store.update_metadata("patients", "run-1").unwrap();
        store.update_metadata("patients", "run-2").unwrap();
        let (count, source): (i64, String) = store
            .connection()
            .query_row(
                "SELECT row_count, source_path FROM metadata WHERE table_name = 'patients'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(source, "run-2");
        let rows: i64 = store
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM metadata WHERE table_name = 'patients'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn code_insert_if_absent_does_not_overwrite() {
        let store = store();
        assert!(store
            .insert_code_if_absent(CodeSpace::Diagnosis, "N390", "Diagnóstico N390")
            .unwrap());
        assert!(!store
            .insert_code_if_absent(CodeSpace::Diagnosis, "N390", "other")
            .unwrap());
        assert_eq!(
            store.code_description(CodeSpace::Diagnosis, "N390").unwrap(),
            Some("Diagnóstico N390".to_string())
        );
    }

    #[test]
    fn diagnosis_upsert_overwrites_placeholder() {
        let store = store();
        store
            .insert_code_if_absent(CodeSpace::Diagnosis, "J15", "Diagnóstico J15")
            .unwrap();
        store
            .upsert_diagnosis("J15", "Pneumonia bacteriana", "Doenças do aparelho respiratório", "J10-J18", true)
            .unwrap();
        assert_eq!(
            store.code_description(CodeSpace::Diagnosis, "J15").unwrap(),
            Some("Pneumonia bacteriana".to_string())
        );
        let sensitive: i64 = store
            .connection()
            .query_row(
                "SELECT primary_care_sensitive FROM diagnoses WHERE code = 'J15'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(sensitive, 1);
    }

    #[test]
    fn observed_codes_unions_both_columns() {
        let store = store();
        let admission = Admission {
            aih_number: Some("1".into()),
            competence_year: Some(2025),
            competence_month: Some(1),
            principal_diagnosis: Some("N390".into()),
            secondary_diagnosis: Some("E119".into()),
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
        };
        store.insert_admission(&admission, None, None).unwrap();
        let mut codes = store.observed_codes(CodeSpace::Diagnosis).unwrap();
        codes.sort();
        assert_eq!(codes, vec!["E119".to_string(), "N390".to_string()]);
    }
}
