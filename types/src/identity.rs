//! Identity keys, biometric templates and the registration payload sealed into blocks.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ValidationError;

/// Status tag written into every registration payload.
pub const STATUS_VERIFIED_ORIGINAL: &str = "VERIFIED_ORIGINAL";

/// Unique business identifier of a registered identity (e.g. a PAN number).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Build a key, trimming surrounding whitespace. Empty keys are rejected.
    pub fn new(key: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = key.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyKey);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex SHA-256 digest of a sensitive secondary identifier.
///
/// Only the digest exists in the system; see `idseal_crypto::hash_secondary_id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecondaryIdHash(String);

impl SecondaryIdHash {
    /// Wrap an already computed hex digest.
    pub fn from_digest_hex(hex: String) -> Self {
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecondaryIdHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fixed-length numeric face feature vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiometricTemplate(Vec<f64>);

impl BiometricTemplate {
    /// Build a template. Every component must be finite (NaN has no JSON form
    /// and would make the sealed payload ambiguous).
    pub fn new(values: Vec<f64>) -> Result<Self, ValidationError> {
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(ValidationError::NonFiniteTemplate(pos));
        }
        Ok(Self(values))
    }

    /// Template of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    /// Check the template has exactly `expected` dimensions.
    pub fn ensure_len(&self, expected: usize) -> Result<(), ValidationError> {
        if self.0.len() != expected {
            return Err(ValidationError::TemplateLength {
                expected,
                actual: self.0.len(),
            });
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The application record sealed into a registration block.
///
/// Holds only the minimal, hashed identity: personal metadata such as date of
/// birth or phone number stays in the identity index and never reaches the chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdentityPayload {
    pub name: String,
    pub key: IdentityKey,
    pub secondary_id_hash: SecondaryIdHash,
    pub biometric_template: BiometricTemplate,
    pub status: String,
}

impl IdentityPayload {
    pub fn new(
        name: String,
        key: IdentityKey,
        secondary_id_hash: SecondaryIdHash,
        biometric_template: BiometricTemplate,
    ) -> Self {
        Self {
            name,
            key,
            secondary_id_hash,
            biometric_template,
            status: STATUS_VERIFIED_ORIGINAL.to_string(),
        }
    }

    /// Convert into the JSON value stored in [`crate::Block::payload`].
    pub fn to_value(&self) -> Result<serde_json::Value, ValidationError> {
        serde_json::to_value(self).map_err(|e| ValidationError::Payload(e.to_string()))
    }

    /// Read a registration payload back out of a block.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ValidationError> {
        serde_json::from_value(value.clone()).map_err(|e| ValidationError::Payload(e.to_string()))
    }
}
