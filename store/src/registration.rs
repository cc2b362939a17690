//! Atomic registration writes.

use crate::{AuditStore, BlockStore, IdentityRecord, IdentityStore, StoreError};
use idseal_types::Block;

/// Block append and identity insert as one unit.
pub trait RegistrationStore: BlockStore + IdentityStore {
    /// Append `block` and insert `record` atomically.
    ///
    /// Either both writes become visible or neither does. A record whose key
    /// is already present is a [`crate::Conflict::DuplicateKey`].
    fn commit_registration(&self, block: &Block, record: &IdentityRecord) -> Result<(), StoreError>;
}

/// Everything the verification pipeline needs from a backend.
pub trait LedgerStore: RegistrationStore + AuditStore + Send + Sync {}

impl<T> LedgerStore for T where T: RegistrationStore + AuditStore + Send + Sync {}
