//! Normalized entities produced from one combined admission row.

use serde::Serialize;

use crate::ids::EntityKey;

/// A person admitted at least once. Identity is the composite of
/// (age, sex, residence municipality, birth date) — the source carries no
/// stable person identifier, so identical composites merge by design.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patient {
    pub key: EntityKey,
    pub age: Option<i64>,
    pub sex_code: Option<String>,
    pub birth_date: Option<String>,
    pub municipality_code: Option<String>,
    pub postal_code: Option<String>,
    pub race_code: Option<String>,
    pub nationality_code: Option<String>,
}

/// A care facility, identified by (CNES registry code, hospital tax id).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Establishment {
    pub key: EntityKey,
    pub cnes: Option<String>,
    pub tax_id: Option<String>,
    pub parent_tax_id: Option<String>,
    pub municipality_code: Option<String>,
    pub specialty_code: Option<String>,
    pub legal_nature_code: Option<String>,
    pub management_code: Option<String>,
    pub complexity_code: Option<String>,
}

/// One hospitalization event; one row per surviving combined-table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Admission {
    pub aih_number: Option<String>,
    pub competence_year: Option<i64>,
    pub competence_month: Option<i64>,
    pub principal_diagnosis: Option<String>,
    pub secondary_diagnosis: Option<String>,
    pub requested_procedure: Option<String>,
    pub performed_procedure: Option<String>,
    pub admission_character: Option<String>,
    pub financing_code: Option<String>,
    pub admission_date: Option<String>,
    pub discharge_date: Option<String>,
    pub stay_days: Option<i64>,
    pub icu_days: Option<i64>,
    pub icu_marker: Option<String>,
    pub risk_pregnancy: Option<String>,
    pub companion_days: Option<i64>,
    pub daily_count: Option<f64>,
    pub sequence_number: Option<i64>,
    pub batch_code: Option<String>,
    pub source_file: Option<String>,
}

/// Monetary sub-totals for one admission.
///
/// Absent source values are zero, not null: the billing extract leaves a
/// sub-total out when nothing was charged, which is different from an
/// unknown amount. The grand total is stored as reported, never
/// recomputed from the parts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialValues {
    pub hospital_services: f64,
    pub professional_services: f64,
    pub diagnostics: f64,
    pub diagnostics_no_split: f64,
    pub newborn: f64,
    pub companion: f64,
    pub prosthesis: f64,
    pub blood: f64,
    pub transport: f64,
    pub obstetric: f64,
    pub pediatric: f64,
    pub icu: f64,
    pub intermediate_care: f64,
    pub hospital_services_federal: f64,
    pub professional_services_federal: f64,
    pub hospital_services_manager: f64,
    pub professional_services_manager: f64,
    pub total: f64,
    pub foreign_currency_total: f64,
}

impl Default for FinancialValues {
    fn default() -> Self {
        Self {
            hospital_services: 0.0,
            professional_services: 0.0,
            diagnostics: 0.0,
            diagnostics_no_split: 0.0,
            newborn: 0.0,
            companion: 0.0,
            prosthesis: 0.0,
            blood: 0.0,
            transport: 0.0,
            obstetric: 0.0,
            pediatric: 0.0,
            icu: 0.0,
            intermediate_care: 0.0,
            hospital_services_federal: 0.0,
            professional_services_federal: 0.0,
            hospital_services_manager: 0.0,
            professional_services_manager: 0.0,
            total: 0.0,
            foreign_currency_total: 0.0,
        }
    }
}

impl FinancialValues {
    /// Sum of the populated sub-totals, excluding the stored grand total
    /// and the foreign-currency figure. Useful as a consistency check;
    /// the stored total is authoritative.
    pub fn subtotal_sum(&self) -> f64 {
        self.hospital_services
            + self.professional_services
            + self.diagnostics
            + self.diagnostics_no_split
            + self.newborn
            + self.companion
            + self.prosthesis
            + self.blood
            + self.transport
            + self.obstetric
            + self.pediatric
            + self.icu
            + self.intermediate_care
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EntityKey;

    #[test]
    fn patient_serializes_with_hex_key() {
        let patient = Patient {
            key: EntityKey::derive(&["45", "1", "4106902", "NA"]),
            age: Some(45),
            sex_code: Some("1".into()),
            birth_date: None,
            municipality_code: Some("4106902".into()),
            postal_code: None,
            race_code: None,
            nationality_code: None,
        };
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["key"].as_str().unwrap().len(), 32);
        assert_eq!(json["age"], 45);
    }

    #[test]
    fn financial_values_default_to_zero() {
        let values = FinancialValues::default();
        assert_eq!(values.total, 0.0);
        assert_eq!(values.subtotal_sum(), 0.0);
    }

    #[test]
    fn subtotal_sum_ignores_grand_total() {
        let values = FinancialValues {
            hospital_services: 100.0,
            professional_services: 50.0,
            total: 999.0,
            ..FinancialValues::default()
        };
        assert_eq!(values.subtotal_sum(), 150.0);
    }
}
