use idseal_store::StoreError;
use idseal_types::ValidationError;
use idseal_work::WorkError;
use thiserror::Error;

use crate::ExtractionError;

/// Failure classes shared by verdicts and errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    IntegrityFailure,
    NoBiometricData,
    ExtractionFailure,
    ThresholdReject,
    PersistenceFailure,
    ValidationError,
    Timeout,
}

/// Server-level failures. Never converted into a verdict.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("identity {0} is already registered")]
    AlreadyRegistered(String),

    #[error("biometric extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("block sealing timed out: {0}")]
    Timeout(String),
}

impl VerificationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::AlreadyRegistered(_) => ErrorKind::ValidationError,
            Self::Extraction(_) => ErrorKind::ExtractionFailure,
            Self::Persistence(_) => ErrorKind::PersistenceFailure,
            Self::Timeout(_) => ErrorKind::Timeout,
        }
    }
}

impl From<WorkError> for VerificationError {
    fn from(e: WorkError) -> Self {
        match e {
            WorkError::Payload(v) => Self::Validation(v),
            other => Self::Timeout(other.to_string()),
        }
    }
}

impl From<idseal_ledger::LedgerError> for VerificationError {
    fn from(e: idseal_ledger::LedgerError) -> Self {
        match e {
            idseal_ledger::LedgerError::Store(s) => Self::Persistence(s),
        }
    }
}
