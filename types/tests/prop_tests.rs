use proptest::prelude::*;

use idseal_types::{BiometricTemplate, BlockHash, Timestamp};

proptest! {
    /// The nibble count agrees with the hex rendering's zero prefix.
    #[test]
    fn leading_zero_nibbles_match_hex_prefix(bytes in prop::array::uniform32(0u8..)) {
        let hash = BlockHash::new(bytes);
        let hex = hash.to_hex();
        let prefix = hex.chars().take_while(|c| *c == '0').count() as u32;
        prop_assert_eq!(hash.leading_zero_nibbles(), prefix);
    }

    /// BlockHash::is_zero is true only for all-zero bytes.
    #[test]
    fn block_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = BlockHash::new(bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// Hashes stored through bincode come back intact.
    #[test]
    fn block_hash_survives_bincode(bytes in prop::array::uniform32(0u8..)) {
        let hash = BlockHash::new(bytes);
        let encoded = bincode::serialize(&hash).unwrap();
        let decoded: BlockHash = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, hash);
    }

    /// Timestamp ordering: a <= b iff millis a <= millis b.
    #[test]
    fn timestamp_ordering(a in any::<u64>(), b in any::<u64>()) {
        let ta = Timestamp::from_millis(a);
        let tb = Timestamp::from_millis(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta.to_string(), a.to_string());
    }

    /// Finite vectors are always accepted as templates.
    #[test]
    fn finite_templates_accepted(values in prop::collection::vec(-1.0f64..1.0, 0..256)) {
        let len = values.len();
        let template = BiometricTemplate::new(values).unwrap();
        prop_assert_eq!(template.len(), len);
    }
}
