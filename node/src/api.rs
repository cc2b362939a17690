//! Request and response bodies for registration and verification.
//!
//! Image bytes travel hex-encoded. Status tags are SCREAMING_CASE strings.

use std::fmt;

use idseal_store::RegistrationMetadata;
use idseal_types::{BiometricStatus, IntegrityStatus, Outcome};
use idseal_verification::{ErrorKind, Registration, RegistrationReceipt, Verdict};
use serde::{Deserialize, Deserializer, Serialize};
use zeroize::Zeroizing;

use crate::NodeError;

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.trim()).map_err(serde::de::Error::custom)
    }
}

fn zeroizing_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Zeroizing<String>, D::Error> {
    String::deserialize(deserializer).map(Zeroizing::new)
}

// ── Register ────────────────────────────────────────────────────────────

/// A new identity to seal into the ledger.
///
/// Deserialize-only: the raw secondary identifier is wiped when the request
/// is dropped and is never written back out.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    /// Primary identity key.
    pub pan_number: String,
    /// Secondary identifier; only its SHA-256 digest is kept.
    #[serde(deserialize_with = "zeroizing_string")]
    pub aadhaar_number: Zeroizing<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub document_paths: Vec<String>,
    #[serde(with = "hex_bytes")]
    pub id_photo: Vec<u8>,
}

impl RegisterRequest {
    /// Split into the orchestrator's registration and the ID photo.
    pub fn into_parts(self) -> (Registration, Vec<u8>) {
        let registration = Registration {
            key: self.pan_number,
            name: self.full_name,
            secondary_id: self.aadhaar_number,
            metadata: RegistrationMetadata {
                dob: self.dob,
                gender: self.gender,
                phone_number: self.phone_number,
                document_paths: self.document_paths,
            },
        };
        (registration, self.id_photo)
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("full_name", &self.full_name)
            .field("pan_number", &self.pan_number)
            .field("aadhaar_number", &"<redacted>")
            .field("id_photo_len", &self.id_photo.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegisterStatus {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub status: RegisterStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<String>,
    pub msg: String,
}

impl RegisterResponse {
    pub fn from_result(result: &Result<RegistrationReceipt, NodeError>) -> Self {
        match result {
            Ok(receipt) => Self {
                status: RegisterStatus::Success,
                block_hash: Some(receipt.block_hash.to_hex()),
                msg: format!("identity sealed in block {}", receipt.index),
            },
            Err(e) => Self {
                status: RegisterStatus::Error,
                block_hash: None,
                msg: e.to_string(),
            },
        }
    }
}

// ── Verify ──────────────────────────────────────────────────────────────

#[derive(Clone, Deserialize)]
pub struct VerifyRequest {
    /// Identity key to verify against.
    pub pan_number: String,
    /// Name claimed by the person presenting.
    pub full_name: String,
    #[serde(with = "hex_bytes")]
    pub live_selfie: Vec<u8>,
}

impl fmt::Debug for VerifyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyRequest")
            .field("pan_number", &self.pan_number)
            .field("full_name", &self.full_name)
            .field("live_selfie_len", &self.live_selfie.len())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerifyStatus {
    Verified,
    Rejected,
    /// Server-level fault: persistence or timeout.
    Failed,
    /// Undecidable input: no biometric data, or no usable face.
    Error,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub status: VerifyStatus,
    pub integrity_check: IntegrityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<String>,
    pub biometric: BiometricStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl VerifyResponse {
    pub fn from_verdict(verdict: &Verdict) -> Self {
        let evidence = verdict.evidence();
        let status = match verdict.outcome() {
            Outcome::Verified => VerifyStatus::Verified,
            Outcome::Rejected => VerifyStatus::Rejected,
            Outcome::Error => VerifyStatus::Error,
        };
        Self {
            status,
            integrity_check: evidence.integrity,
            block_hash: evidence.block_hash.map(|h| h.to_hex()),
            biometric: evidence.biometric,
            name_score: evidence.name_score,
            distance: evidence.distance,
            reason: verdict.reason().map(str::to_string),
        }
    }

    pub fn from_error(error: &NodeError) -> Self {
        let status = match error {
            NodeError::Verification(e)
                if matches!(e.kind(), ErrorKind::ExtractionFailure | ErrorKind::ValidationError) =>
            {
                VerifyStatus::Error
            }
            NodeError::Validation(_) => VerifyStatus::Error,
            _ => VerifyStatus::Failed,
        };
        Self {
            status,
            integrity_check: IntegrityStatus::NotChecked,
            block_hash: None,
            biometric: BiometricStatus::Skipped,
            name_score: None,
            distance: None,
            reason: Some(error.to_string()),
        }
    }

    pub fn from_result(result: &Result<Verdict, NodeError>) -> Self {
        match result {
            Ok(verdict) => Self::from_verdict(verdict),
            Err(e) => Self::from_error(e),
        }
    }
}
