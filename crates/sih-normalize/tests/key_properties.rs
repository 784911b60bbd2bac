//! Property tests for composite-key derivation.

use proptest::prelude::*;

use sih_normalize::{establishment_key, patient_key};

proptest! {
    #[test]
    fn patient_key_is_pure(
        age in 0i64..130,
        sex in "[129]",
        municipality in "[0-9]{6,7}",
        birth in "(19|20)[0-9]{2}-[0-1][0-9]-[0-3][0-9]",
    ) {
        let age = age.to_string();
        let a = patient_key(Some(&age), Some(&sex), Some(&municipality), Some(&birth));
        let b = patient_key(Some(&age), Some(&sex), Some(&municipality), Some(&birth));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn patient_key_changes_with_any_component(
        age in 0i64..129,
        municipality in "[0-9]{7}",
    ) {
        let age_a = age.to_string();
        let age_b = (age + 1).to_string();
        let a = patient_key(Some(&age_a), Some("1"), Some(&municipality), None);
        let b = patient_key(Some(&age_b), Some("1"), Some(&municipality), None);
        prop_assert_ne!(a, b);
    }

    #[test]
    fn establishment_key_is_pure(cnes in "[0-9]{7}", tax_id in "[0-9]{14}") {
        let a = establishment_key(Some(&cnes), Some(&tax_id));
        let b = establishment_key(Some(&cnes), Some(&tax_id));
        prop_assert_eq!(a, b);
    }
}
