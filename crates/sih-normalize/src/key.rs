//! Composite entity identity.
//!
//! The extract carries no stable person or facility identifier, so
//! identity is derived from fixed field tuples. Missing components are
//! replaced by [`MISSING_KEY_TOKEN`] rather than omitted, keeping the key
//! well-formed; rows missing the same fields collide into one entity,
//! which is the intended merge rule (and a documented false-merge risk
//! for genuinely distinct people with identical demographics).

use sih_model::{EntityKey, MISSING_KEY_TOKEN};

fn component(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim(),
        _ => MISSING_KEY_TOKEN,
    }
}

/// Patient identity: (age, sex code, residence municipality, birth date).
pub fn patient_key(
    age: Option<&str>,
    sex: Option<&str>,
    municipality: Option<&str>,
    birth_date: Option<&str>,
) -> EntityKey {
    EntityKey::derive(&[
        component(age),
        component(sex),
        component(municipality),
        component(birth_date),
    ])
}

/// Establishment identity: (CNES facility code, hospital tax id).
pub fn establishment_key(cnes: Option<&str>, tax_id: Option<&str>) -> EntityKey {
    EntityKey::derive(&[component(cnes), component(tax_id)])
}
