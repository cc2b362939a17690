//! Identity index storage trait.

use crate::StoreError;
use idseal_types::{BiometricTemplate, BlockHash, IdentityKey, SecondaryIdHash, Timestamp};
use serde::{Deserialize, Serialize};

/// Personal details captured at registration. Kept off-chain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationMetadata {
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    /// Paths of uploaded identity documents, as given by the caller.
    pub document_paths: Vec<String>,
}

/// Index entry for one registered identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub key: IdentityKey,
    pub name: String,
    pub secondary_id_hash: SecondaryIdHash,
    /// Absent only for imported legacy rows.
    pub biometric_template: Option<BiometricTemplate>,
    /// Registration block in the ledger.
    pub latest_block_hash: BlockHash,
    pub verified: bool,
    pub metadata: RegistrationMetadata,
    pub registered_at: Timestamp,
}

/// Lookup by unique identity key.
pub trait IdentityStore {
    fn get_identity(&self, key: &IdentityKey) -> Result<IdentityRecord, StoreError>;

    fn identity_exists(&self, key: &IdentityKey) -> Result<bool, StoreError>;

    fn identity_count(&self) -> Result<u64, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_survives_bincode() {
        let record = IdentityRecord {
            key: IdentityKey::new("ABCDE1234F").unwrap(),
            name: "Asha Rao".into(),
            secondary_id_hash: SecondaryIdHash::from_digest_hex("ab".repeat(32)),
            biometric_template: Some(BiometricTemplate::new(vec![0.5, -0.25]).unwrap()),
            latest_block_hash: BlockHash::new([3; 32]),
            verified: true,
            metadata: RegistrationMetadata {
                dob: Some("1990-01-01".into()),
                document_paths: vec!["uploads/pan.png".into()],
                ..Default::default()
            },
            registered_at: Timestamp::from_millis(42),
        };
        let bytes = bincode::serialize(&record).unwrap();
        let back: IdentityRecord = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, record);
    }
}
