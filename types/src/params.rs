//! Ledger parameters — difficulty and the verification thresholds.

use serde::{Deserialize, Serialize};

/// Dimensionality of the face feature vectors produced by the extractor.
pub const DEFAULT_TEMPLATE_LEN: usize = 128;

/// Tunable parameters shared by mining, matching and verification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Required number of leading zero hex characters in a block hash.
    pub difficulty: u8,

    /// Minimum name-similarity score (0–100) for a claimed name to match.
    pub name_match_threshold: u8,

    /// Biometric match predicate: `distance < biometric_tolerance`.
    pub biometric_tolerance: f64,

    /// Required length of every biometric template.
    pub template_len: usize,
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            difficulty: 2,
            name_match_threshold: 80,
            biometric_tolerance: 0.6,
            template_len: DEFAULT_TEMPLATE_LEN,
        }
    }
}

impl LedgerParams {
    /// Fast parameters for tests: no proof-of-work, short templates.
    pub fn dev_defaults() -> Self {
        Self {
            difficulty: 0,
            template_len: 4,
            ..Self::default()
        }
    }
}
