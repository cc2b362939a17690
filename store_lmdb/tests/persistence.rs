use idseal_store::{
    AuditEntry, AuditStore, BlockStore, Conflict, IdentityRecord, IdentityStore,
    RegistrationMetadata, RegistrationStore, StoreError,
};
use idseal_store_lmdb::LmdbEnvironment;
use idseal_types::{Block, BlockHash, IdentityKey, Outcome, SecondaryIdHash, Timestamp};

const MAP_SIZE: usize = 10 * 1024 * 1024;

fn block(index: u64, previous_hash: BlockHash, tag: u8) -> Block {
    Block {
        index,
        previous_hash,
        timestamp: Timestamp::from_millis(1_700_000_000_000 + index),
        payload: serde_json::json!({"key": format!("K{tag}")}),
        nonce: u64::from(tag),
        hash: BlockHash::new([tag; 32]),
    }
}

fn record(key: &str, hash: BlockHash) -> IdentityRecord {
    IdentityRecord {
        key: IdentityKey::new(key).unwrap(),
        name: "Asha Rao".into(),
        secondary_id_hash: SecondaryIdHash::from_digest_hex("ef".repeat(32)),
        biometric_template: None,
        latest_block_hash: hash,
        verified: true,
        metadata: RegistrationMetadata {
            phone_number: Some("+91 90000 00000".into()),
            ..Default::default()
        },
        registered_at: Timestamp::from_millis(5),
    }
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let first = block(0, BlockHash::ZERO, 1);
    {
        let env = LmdbEnvironment::open(dir.path(), 8, MAP_SIZE).unwrap();
        env.commit_registration(&first, &record("K1", first.hash)).unwrap();
        env.append_audit(&AuditEntry::for_key(
            &IdentityKey::new("K1").unwrap(),
            Outcome::Verified,
            Timestamp::from_millis(9),
        ))
        .unwrap();
    }

    let env = LmdbEnvironment::open(dir.path(), 8, MAP_SIZE).unwrap();
    assert_eq!(env.schema_version().unwrap(), 1);
    assert_eq!(env.get_last().unwrap(), Some(first.clone()));
    assert_eq!(
        env.get_identity(&IdentityKey::new("K1").unwrap()).unwrap(),
        record("K1", first.hash)
    );
    let audit = env.iter_audit().unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].outcome, Outcome::Verified);
}

#[test]
fn duplicate_key_rolls_back_block_append() {
    let dir = tempfile::tempdir().unwrap();
    let env = LmdbEnvironment::open(dir.path(), 8, MAP_SIZE).unwrap();
    let first = block(0, BlockHash::ZERO, 1);
    env.commit_registration(&first, &record("K1", first.hash)).unwrap();

    let second = block(1, first.hash, 2);
    let err = env
        .commit_registration(&second, &record("K1", second.hash))
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(Conflict::DuplicateKey(_))));

    assert_eq!(env.block_count().unwrap(), 1);
    assert!(!env.exists(&second.hash).unwrap());
    assert_eq!(env.identity_count().unwrap(), 1);
}

#[test]
fn stale_registration_leaves_no_identity() {
    let dir = tempfile::tempdir().unwrap();
    let env = LmdbEnvironment::open(dir.path(), 8, MAP_SIZE).unwrap();
    let first = block(0, BlockHash::ZERO, 1);
    env.append(&first).unwrap();

    // Mined against the genesis tip, but another block won the race.
    let loser = block(0, BlockHash::ZERO, 2);
    let err = env.commit_registration(&loser, &record("K2", loser.hash)).unwrap_err();
    assert!(matches!(err, StoreError::Conflict(Conflict::IndexOutOfOrder { .. })));
    assert!(!env.identity_exists(&IdentityKey::new("K2").unwrap()).unwrap());
}

#[test]
fn concurrent_writers_never_fork_the_chain() {
    let dir = tempfile::tempdir().unwrap();
    let env = LmdbEnvironment::open(dir.path(), 8, MAP_SIZE).unwrap();

    let handles: Vec<_> = (1u8..=8)
        .map(|tag| {
            let env = env.clone();
            std::thread::spawn(move || env.append(&block(0, BlockHash::ZERO, tag)).is_ok())
        })
        .collect();
    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(winners, 1);
    assert_eq!(env.block_count().unwrap(), 1);
}
