use proptest::prelude::*;
use serde_json::json;

use idseal_ledger::{ChainFault, ChainReport, IntegrityVerifier};
use idseal_store::BlockStore;
use idseal_store_lmdb::LmdbEnvironment;
use idseal_types::{Block, ChainTip, Timestamp};
use idseal_work::{BlockMiner, Difficulty};

fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let env = LmdbEnvironment::open(dir.path(), 8, 10 * 1024 * 1024).expect("failed to open env");
    (dir, env)
}

fn append_mined(env: &LmdbEnvironment, name: &str) -> Block {
    let tip = env.tip().unwrap();
    let block = BlockMiner::new(Difficulty::DEFAULT)
        .mine(json!({"name": name}), &tip, Timestamp::now())
        .unwrap();
    env.append(&block).unwrap();
    block
}

#[test]
fn stored_chain_verifies() {
    let (_dir, env) = temp_env();
    for name in ["a", "b", "c"] {
        append_mined(&env, name);
    }
    let report = IntegrityVerifier::default().verify_store(&env).unwrap();
    assert_eq!(report, ChainReport::Passed { blocks: 3 });
}

#[test]
fn empty_store_verifies() {
    let (_dir, env) = temp_env();
    assert!(IntegrityVerifier::default().verify_store(&env).unwrap().passed());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Any single-field change to a mined block is caught by the self-hash.
    #[test]
    fn any_payload_edit_breaks_integrity(name in "[a-z]{1,10}", edit in "[A-Z]{1,10}") {
        let block = BlockMiner::new(Difficulty::DEFAULT)
            .mine(json!({"name": name}), &ChainTip::Genesis, Timestamp::from_millis(1))
            .unwrap();
        let verifier = IntegrityVerifier::default();
        prop_assert!(verifier.verify(&block).passed());

        let mut tampered = block.clone();
        tampered.payload = json!({"name": edit});
        prop_assert!(!verifier.verify(&tampered).passed());
        prop_assert!(
            matches!(
                verifier.verify_chain(&[tampered]),
                ChainReport::FailedAt { index: 0, fault: ChainFault::HashMismatch { .. } }
            ),
            "chain walk must flag the edited block"
        );
    }
}
