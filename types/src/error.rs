//! Validation error shared across crates.

use thiserror::Error;

/// Input that can never become a valid ledger value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid block hash: {0:?}")]
    InvalidHash(String),

    #[error("identity key must not be empty")]
    EmptyKey,

    #[error("name must not be empty")]
    EmptyName,

    #[error("biometric template has {actual} dimensions, expected {expected}")]
    TemplateLength { expected: usize, actual: usize },

    #[error("biometric templates differ in length: {left} vs {right}")]
    TemplateLengthMismatch { left: usize, right: usize },

    #[error("biometric template contains a non-finite value at position {0}")]
    NonFiniteTemplate(usize),

    #[error("difficulty {0} exceeds the 64 hex characters of a block hash")]
    DifficultyOutOfRange(u8),

    #[error("invalid payload: {0}")]
    Payload(String),
}
