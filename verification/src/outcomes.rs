//! Verification verdicts and the evidence behind them.

use idseal_types::{BiometricStatus, BlockHash, IntegrityStatus, Outcome};
use serde::Serialize;

use crate::ErrorKind;

/// Signals gathered before the pipeline stopped.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Evidence {
    pub name_score: Option<u8>,
    pub integrity: IntegrityStatus,
    pub biometric: BiometricStatus,
    pub distance: Option<f64>,
    pub block_hash: Option<BlockHash>,
}

impl Default for Evidence {
    fn default() -> Self {
        Self {
            name_score: None,
            integrity: IntegrityStatus::NotChecked,
            biometric: BiometricStatus::Skipped,
            distance: None,
            block_hash: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum RejectReason {
    IdentityNotFound,
    NameMismatch { score: u8 },
    LedgerRecordMissing,
    IntegrityCheckFailed,
    BiometricMismatch { distance: f64 },
}

impl RejectReason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::IdentityNotFound => "identity not found",
            Self::NameMismatch { .. } => "name mismatch",
            Self::LedgerRecordMissing => "ledger record missing",
            Self::IntegrityCheckFailed => "integrity check failed",
            Self::BiometricMismatch { .. } => "biometric mismatch",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IdentityNotFound | Self::LedgerRecordMissing => ErrorKind::NotFound,
            Self::NameMismatch { .. } | Self::BiometricMismatch { .. } => ErrorKind::ThresholdReject,
            Self::IntegrityCheckFailed => ErrorKind::IntegrityFailure,
        }
    }
}

/// A verification that could not be decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum VerdictError {
    NoBiometricData,
}

impl VerdictError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoBiometricData => "no biometric data registered",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoBiometricData => ErrorKind::NoBiometricData,
        }
    }
}

/// Business-level result of one verification.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Verdict {
    Verified { evidence: Evidence },
    Rejected { reason: RejectReason, evidence: Evidence },
    Error { reason: VerdictError, evidence: Evidence },
}

impl Verdict {
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Verified { .. } => Outcome::Verified,
            Self::Rejected { .. } => Outcome::Rejected,
            Self::Error { .. } => Outcome::Error,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }

    pub fn evidence(&self) -> &Evidence {
        match self {
            Self::Verified { evidence }
            | Self::Rejected { evidence, .. }
            | Self::Error { evidence, .. } => evidence,
        }
    }

    /// Human-readable reason; `None` for a verified identity.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Verified { .. } => None,
            Self::Rejected { reason, .. } => Some(reason.message()),
            Self::Error { reason, .. } => Some(reason.message()),
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Verified { .. } => None,
            Self::Rejected { reason, .. } => Some(reason.kind()),
            Self::Error { reason, .. } => Some(reason.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_reports_reason_and_kind() {
        let verdict = Verdict::Rejected {
            reason: RejectReason::NameMismatch { score: 40 },
            evidence: Evidence {
                name_score: Some(40),
                ..Default::default()
            },
        };
        assert_eq!(verdict.outcome(), Outcome::Rejected);
        assert_eq!(verdict.reason(), Some("name mismatch"));
        assert_eq!(verdict.kind(), Some(ErrorKind::ThresholdReject));
        assert_eq!(verdict.evidence().integrity, IntegrityStatus::NotChecked);
    }

    #[test]
    fn integrity_rejection_is_integrity_failure() {
        assert_eq!(RejectReason::IntegrityCheckFailed.kind(), ErrorKind::IntegrityFailure);
        assert_eq!(RejectReason::IdentityNotFound.message(), "identity not found");
    }

    #[test]
    fn missing_template_is_an_error_verdict() {
        let verdict = Verdict::Error {
            reason: VerdictError::NoBiometricData,
            evidence: Evidence::default(),
        };
        assert_eq!(verdict.outcome(), Outcome::Error);
        assert_eq!(verdict.reason(), Some("no biometric data registered"));
        assert!(!verdict.is_verified());
    }
}
