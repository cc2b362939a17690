//! Outcome tags shared by verdicts, audit entries and wire responses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Final decision of one verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Verified,
    Rejected,
    Error,
}

/// Result of recomputing a block's hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrityStatus {
    Passed,
    Failed,
    /// The pipeline stopped before the ledger was consulted.
    NotChecked,
}

/// Result of the biometric comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BiometricStatus {
    Match,
    NoMatch,
    Skipped,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "VERIFIED",
            Self::Rejected => "REJECTED",
            Self::Error => "ERROR",
        }
    }
}

impl IntegrityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::NotChecked => "NOT_CHECKED",
        }
    }
}

impl BiometricStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "MATCH",
            Self::NoMatch => "NO_MATCH",
            Self::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for IntegrityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BiometricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_tags_match_display() {
        for outcome in [Outcome::Verified, Outcome::Rejected, Outcome::Error] {
            let json = serde_json::to_string(&outcome).unwrap();
            assert_eq!(json, format!("\"{}\"", outcome));
        }
        assert_eq!(
            serde_json::to_string(&IntegrityStatus::NotChecked).unwrap(),
            "\"NOT_CHECKED\""
        );
        assert_eq!(
            serde_json::to_string(&BiometricStatus::NoMatch).unwrap(),
            "\"NO_MATCH\""
        );
    }
}
