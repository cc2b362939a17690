use idseal_types::BlockHash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("write conflict: {0}")]
    Conflict(#[from] Conflict),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// A write rejected by the ledger's uniqueness or ordering constraints.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Conflict {
    #[error("block {0} already exists")]
    DuplicateHash(BlockHash),

    #[error("expected block index {expected}, got {actual}")]
    IndexOutOfOrder { expected: u64, actual: u64 },

    #[error("block does not link to the current tip {tip}")]
    StaleTip { tip: BlockHash },

    #[error("identity {0} is already registered")]
    DuplicateKey(String),
}
