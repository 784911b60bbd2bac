//! Code-variant generation for retry lookups.
//!
//! Extract codes drift from the canonical reference form: float
//! round-trips add `.0`, leading zeros get lost, municipality codes show
//! up with six of their seven digits. Each space has a fixed variant
//! list, tried in order after the exact code misses everywhere. Variant
//! matching can collide two distinct codes onto one reference entry
//! (e.g. truncation); that is a known limitation carried over from the
//! source system, not something this layer guards against.

use sih_common::strip_digits;
use sih_model::CodeSpace;

/// Ordered variants of `code` to retry, exact form excluded. Duplicates
/// are removed; order is preserved.
pub fn code_variants(space: CodeSpace, code: &str) -> Vec<String> {
    let mut variants: Vec<String> = Vec::new();
    let digits = strip_digits(code);

    match space {
        CodeSpace::Diagnosis => {
            // "N39.0" → "N390"; then category-level prefixes.
            let compact: String = code.chars().filter(|c| *c != '.').collect();
            variants.push(compact.clone());
            if compact.len() > 4 {
                variants.push(compact[..4].to_string());
            }
            if compact.len() > 3 {
                variants.push(compact[..3].to_string());
            }
        }
        CodeSpace::Municipality => {
            variants.push(digits.clone());
            variants.push(format!("{digits:0>7}"));
            variants.push(digits.trim_start_matches('0').to_string());
            if digits.len() == 7 {
                // Extract sometimes drops the check digit instead.
                variants.push(digits[..6].to_string());
            }
            if digits.len() == 6 && digits.starts_with("41") {
                // Six-digit Paraná codes lost their check digit; try all.
                for check in 0..10 {
                    variants.push(format!("{digits}{check}"));
                }
            }
        }
        CodeSpace::Procedure => {
            variants.push(digits.clone());
            variants.push(format!("0{digits}"));
            variants.push(format!("{digits:0>10}"));
            variants.push(digits.trim_start_matches('0').to_string());
        }
        CodeSpace::Establishment => {
            variants.push(digits.clone());
            variants.push(format!("{digits:0>14}"));
        }
    }

    variants.retain(|variant| !variant.is_empty() && variant != code);
    let mut seen = std::collections::HashSet::new();
    variants.retain(|variant| seen.insert(variant.clone()));
    variants
}
