//! Per-row schema normalization.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use sih_common::{parse_f64, parse_i64};
use sih_model::{Admission, Establishment, FinancialValues, Patient, RawTable, columns};
use sih_store::{Result, Store};

use crate::cache::KeyCache;
use crate::key::{establishment_key, patient_key};

/// Rows between intermediate commits, so a mid-run failure keeps earlier
/// progress.
pub const CHECKPOINT_ROWS: usize = 500;

/// One skipped combined-table row, with the reason retained for the
/// post-run report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizeReport {
    pub rows_processed: usize,
    pub admissions_inserted: usize,
    pub patients_created: usize,
    pub establishments_created: usize,
    pub failures: Vec<RowFailure>,
}

impl NormalizeReport {
    pub fn rows_skipped(&self) -> usize {
        self.failures.len()
    }
}

/// Positional access to one row by column name.
struct RowView<'t> {
    row: &'t [Option<String>],
    indices: &'t HashMap<&'t str, usize>,
}

impl<'t> RowView<'t> {
    fn cell(&self, name: &str) -> Option<&'t str> {
        self.indices
            .get(name)
            .and_then(|&idx| self.row.get(idx))
            .and_then(|value| value.as_deref())
    }

    fn text(&self, name: &str) -> Option<String> {
        self.cell(name).map(String::from)
    }

    fn int(&self, name: &str) -> std::result::Result<Option<i64>, String> {
        match self.cell(name) {
            None => Ok(None),
            Some(value) => parse_i64(value)
                .map(Some)
                .ok_or_else(|| format!("{name}: invalid integer '{value}'")),
        }
    }

    fn float(&self, name: &str) -> std::result::Result<Option<f64>, String> {
        match self.cell(name) {
            None => Ok(None),
            Some(value) => parse_f64(value)
                .map(Some)
                .ok_or_else(|| format!("{name}: invalid number '{value}'")),
        }
    }

    /// Monetary cells: absent means no charge (0.0), present-but-untypable
    /// rejects the row.
    fn money(&self, name: &str) -> std::result::Result<f64, String> {
        Ok(self.float(name)?.unwrap_or(0.0))
    }
}

/// Normalizes combined-table rows into the entity tables.
///
/// Holds the run-scoped key caches; one `Normalizer` per run.
pub struct Normalizer<'a> {
    store: &'a Store,
    patients: KeyCache,
    establishments: KeyCache,
}

impl<'a> Normalizer<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            patients: KeyCache::new(),
            establishments: KeyCache::new(),
        }
    }

    pub fn normalize(&mut self, table: &RawTable) -> Result<NormalizeReport> {
        self.normalize_with_progress(table, |_| {})
    }

    /// As [`normalize`](Self::normalize), reporting each processed row
    /// index to `progress`.
    pub fn normalize_with_progress(
        &mut self,
        table: &RawTable,
        mut progress: impl FnMut(usize),
    ) -> Result<NormalizeReport> {
        let mut report = NormalizeReport::default();
        let indices = table.column_indices();

        self.store.begin()?;
        for (row_idx, row) in table.rows().iter().enumerate() {
            report.rows_processed += 1;
            let view = RowView {
                row,
                indices: &indices,
            };
            match self.normalize_row(&view, &mut report) {
                Ok(()) => {}
                Err(reason) => {
                    warn!(row = row_idx, reason = %reason, "skipping row");
                    report.failures.push(RowFailure {
                        row: row_idx,
                        reason,
                    });
                }
            }
            if (row_idx + 1) % CHECKPOINT_ROWS == 0 {
                self.store.commit()?;
                self.store.begin()?;
            }
            progress(row_idx + 1);
        }
        self.store.commit()?;

        info!(
            rows = report.rows_processed,
            admissions = report.admissions_inserted,
            patients = report.patients_created,
            establishments = report.establishments_created,
            skipped = report.rows_skipped(),
            "normalization finished"
        );
        Ok(report)
    }

    /// Processes one row; an `Err` is a recorded skip, never an abort.
    fn normalize_row(
        &mut self,
        view: &RowView<'_>,
        report: &mut NormalizeReport,
    ) -> std::result::Result<(), String> {
        // Admission and financial typing first, so a bad row is rejected
        // before any entity rows are written for it.
        let admission = build_admission(view)?;
        let values = build_financial_values(view)?;

        let p_key = patient_key(
            view.cell(columns::IDADE),
            view.cell(columns::SEXO),
            view.cell(columns::MUNIC_RES),
            view.cell(columns::NASC),
        );
        let store = self.store;
        let created_before = self.patients.len();
        let patient_id = self.patients.get_or_insert_with(p_key, || {
            store
                .insert_patient(&Patient {
                    key: p_key,
                    age: view.cell(columns::IDADE).and_then(parse_i64),
                    sex_code: view.text(columns::SEXO),
                    birth_date: view.text(columns::NASC),
                    municipality_code: view.text(columns::MUNIC_RES),
                    postal_code: view.text(columns::CEP),
                    race_code: view.text(columns::RACA_COR),
                    nationality_code: view.text(columns::NACIONAL),
                })
                .map_err(|e| e.to_string())
        })?;
        report.patients_created += self.patients.len() - created_before;

        let e_key = establishment_key(view.cell(columns::CNES), view.cell(columns::CGC_HOSP));
        let created_before = self.establishments.len();
        let establishment_id = self.establishments.get_or_insert_with(e_key, || {
            store
                .insert_establishment(&Establishment {
                    key: e_key,
                    cnes: view.text(columns::CNES),
                    tax_id: view.text(columns::CGC_HOSP),
                    parent_tax_id: view.text(columns::CNPJ_MANT),
                    municipality_code: view.text(columns::MUNIC_MOV),
                    specialty_code: view.text(columns::ESPEC),
                    legal_nature_code: view.text(columns::NAT_JUR),
                    management_code: view.text(columns::GESTAO),
                    complexity_code: view.text(columns::COMPLEX),
                })
                .map_err(|e| e.to_string())
        })?;
        report.establishments_created += self.establishments.len() - created_before;

        let admission_id = store
            .insert_admission(&admission, Some(patient_id), Some(establishment_id))
            .map_err(|e| e.to_string())?;
        store
            .insert_financial_values(admission_id, &values)
            .map_err(|e| e.to_string())?;
        report.admissions_inserted += 1;
        Ok(())
    }
}

fn build_admission(view: &RowView<'_>) -> std::result::Result<Admission, String> {
    Ok(Admission {
        aih_number: view.text(columns::N_AIH),
        competence_year: view.int(columns::ANO_CMPT)?,
        competence_month: view.int(columns::MES_CMPT)?,
        principal_diagnosis: view.text(columns::DIAG_PRINC),
        secondary_diagnosis: view.text(columns::DIAGSEC1),
        requested_procedure: view.text(columns::PROC_SOLIC),
        performed_procedure: view.text(columns::PROC_REA),
        admission_character: view.text(columns::CAR_INT),
        financing_code: view.text(columns::FINANC),
        admission_date: view.text(columns::DT_INTER),
        discharge_date: view.text(columns::DT_SAIDA),
        stay_days: view.int(columns::DIAS_PERM)?,
        icu_days: view.int(columns::UTI_MES_TO)?,
        icu_marker: view.text(columns::MARCA_UTI),
        risk_pregnancy: view.text(columns::GESTRISCO),
        companion_days: view.int(columns::DIAR_ACOM)?,
        daily_count: view.float(columns::QT_DIARIAS)?,
        sequence_number: view.int(columns::SEQUENCIA)?,
        batch_code: view.text(columns::REMESSA),
        source_file: view.text(columns::ARQUIVO_ORIGEM),
    })
}

fn build_financial_values(view: &RowView<'_>) -> std::result::Result<FinancialValues, String> {
    Ok(FinancialValues {
        hospital_services: view.money(columns::VAL_SH)?,
        professional_services: view.money(columns::VAL_SP)?,
        diagnostics: view.money(columns::VAL_SADT)?,
        diagnostics_no_split: view.money(columns::VAL_SADTSR)?,
        newborn: view.money(columns::VAL_RN)?,
        companion: view.money(columns::VAL_ACOMP)?,
        prosthesis: view.money(columns::VAL_ORTP)?,
        blood: view.money(columns::VAL_SANGUE)?,
        transport: view.money(columns::VAL_TRANSP)?,
        obstetric: view.money(columns::VAL_OBSANG)?,
        pediatric: view.money(columns::VAL_PED1AC)?,
        icu: view.money(columns::VAL_UTI)?,
        intermediate_care: view.money(columns::VAL_UCI)?,
        hospital_services_federal: view.money(columns::VAL_SH_FED)?,
        professional_services_federal: view.money(columns::VAL_SP_FED)?,
        hospital_services_manager: view.money(columns::VAL_SH_GES)?,
        professional_services_manager: view.money(columns::VAL_SP_GES)?,
        total: view.money(columns::VAL_TOT)?,
        foreign_currency_total: view.money(columns::US_TOT)?,
    })
}
