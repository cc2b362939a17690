use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] idseal_store::StoreError),

    #[error("lmdb error: {0}")]
    Lmdb(#[from] idseal_store_lmdb::LmdbError),

    #[error("verification error: {0}")]
    Verification(#[from] idseal_verification::VerificationError),

    #[error("invalid parameters: {0}")]
    Validation(#[from] idseal_types::ValidationError),

    #[error("data directory unusable: {0}")]
    DataDir(String),

    #[error("ledger database is corrupt: {0}")]
    Corrupt(String),

    #[error("mining lane closed")]
    LaneClosed,

    #[error("background task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NodeError {
    /// Whether the failure comes from a timed-out proof-of-work search.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Verification(idseal_verification::VerificationError::Timeout(_))
        )
    }
}
