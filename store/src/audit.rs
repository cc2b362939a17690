//! Verification audit trail.

use crate::StoreError;
use idseal_types::{BiometricStatus, IdentityKey, IntegrityStatus, Outcome, Timestamp};
use serde::{Deserialize, Serialize};

/// One recorded verification decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Assigned by the store on append.
    pub sequence: u64,
    /// Key the claimant presented (it may not be registered).
    pub key: String,
    pub name_score: Option<u8>,
    pub biometric: BiometricStatus,
    pub integrity: IntegrityStatus,
    pub outcome: Outcome,
    pub reason: Option<String>,
    pub at: Timestamp,
}

impl AuditEntry {
    pub fn for_key(key: &IdentityKey, outcome: Outcome, at: Timestamp) -> Self {
        Self {
            sequence: 0,
            key: key.as_str().to_string(),
            name_score: None,
            biometric: BiometricStatus::Skipped,
            integrity: IntegrityStatus::NotChecked,
            outcome,
            reason: None,
            at,
        }
    }
}

/// Append-only log of verification decisions.
pub trait AuditStore {
    /// Append an entry. The store ignores `entry.sequence` and returns the
    /// sequence number it assigned (starting at 0).
    fn append_audit(&self, entry: &AuditEntry) -> Result<u64, StoreError>;

    /// All entries in sequence order.
    fn iter_audit(&self) -> Result<Vec<AuditEntry>, StoreError>;

    fn audit_count(&self) -> Result<u64, StoreError> {
        self.iter_audit().map(|v| v.len() as u64)
    }
}
