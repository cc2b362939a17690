use proptest::prelude::*;

use idseal_node::{BiometricMode, NodeConfig};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any valid configuration survives a trip through its TOML file form.
    #[test]
    fn valid_config_survives_toml(
        difficulty in 0u8..=64,
        threshold in 0u8..=100,
        tolerance in 0.01f64..10.0,
        template_len in 1usize..2048,
        stub in any::<bool>(),
        workers in 1usize..16,
        deadline_ms in 1u64..600_000,
    ) {
        let config = NodeConfig {
            difficulty,
            name_match_threshold: threshold,
            biometric_tolerance: tolerance,
            template_len,
            biometric_mode: if stub { BiometricMode::Stub } else { BiometricMode::Live },
            mining_workers: workers,
            mining_deadline_ms: deadline_ms,
            ..NodeConfig::default()
        };
        prop_assert!(config.validate().is_ok());

        let parsed = NodeConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        prop_assert_eq!(parsed.ledger_params(), config.ledger_params());
        prop_assert_eq!(parsed.biometric_mode, config.biometric_mode);
        prop_assert_eq!(parsed.mining_workers, workers);
        prop_assert_eq!(parsed.mining_deadline_ms, deadline_ms);
    }
}
