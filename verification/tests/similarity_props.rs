use proptest::prelude::*;

use idseal_types::BiometricTemplate;
use idseal_verification::{biometric_distance, name_similarity};

proptest! {
    #[test]
    fn similarity_is_bounded_and_reflexive(a in "\\PC{0,24}", b in "\\PC{0,24}") {
        let score = name_similarity(&a, &b);
        prop_assert!(score <= 100);
        prop_assert_eq!(name_similarity(&a, &a), 100);
    }

    #[test]
    fn similarity_ignores_case(a in "[a-zA-Z ]{0,24}", b in "[a-zA-Z ]{0,24}") {
        prop_assert_eq!(
            name_similarity(&a, &b),
            name_similarity(&a.to_uppercase(), &b.to_lowercase())
        );
    }

    #[test]
    fn distance_is_symmetric_and_non_negative(
        pairs in prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1..64)
    ) {
        let (left, right): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let a = BiometricTemplate::new(left).unwrap();
        let b = BiometricTemplate::new(right).unwrap();
        let ab = biometric_distance(&a, &b).unwrap();
        let ba = biometric_distance(&b, &a).unwrap();
        prop_assert!(ab >= 0.0);
        prop_assert_eq!(ab, ba);
        prop_assert_eq!(biometric_distance(&a, &a).unwrap(), 0.0);
    }
}
