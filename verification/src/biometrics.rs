//! Biometric capability set and feature extraction.

use std::fmt;
use std::sync::Arc;

use idseal_types::BiometricTemplate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("no face detected in image")]
    NoFaceDetected,

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("extractor returned {actual} dimensions, expected {expected}")]
    WrongDimension { expected: usize, actual: usize },
}

/// Turns an image into a fixed-length face template.
///
/// Implementations wrap an external model; the ledger treats them as a black
/// box that either returns a vector or fails.
pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, image: &[u8]) -> Result<BiometricTemplate, ExtractionError>;
}

/// Reads a precomputed face encoding: a JSON array of numbers.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonTemplateExtractor;

impl FeatureExtractor for JsonTemplateExtractor {
    fn extract(&self, image: &[u8]) -> Result<BiometricTemplate, ExtractionError> {
        let values: Vec<f64> = serde_json::from_slice(image)
            .map_err(|e| ExtractionError::InvalidImage(e.to_string()))?;
        if values.is_empty() {
            return Err(ExtractionError::NoFaceDetected);
        }
        BiometricTemplate::new(values).map_err(|e| ExtractionError::InvalidImage(e.to_string()))
    }
}

/// How biometrics are handled, fixed at construction.
///
/// `Stub` is selected explicitly by configuration; it is never a fallback for
/// a failing extractor.
#[derive(Clone)]
pub enum BiometricCapabilities {
    /// Real extraction; a match needs `distance < tolerance`.
    Live {
        extractor: Arc<dyn FeatureExtractor>,
        tolerance: f64,
    },
    /// Extraction yields an all-zero template and every comparison matches.
    Stub,
}

impl BiometricCapabilities {
    pub fn live(extractor: Arc<dyn FeatureExtractor>, tolerance: f64) -> Self {
        Self::Live {
            extractor,
            tolerance,
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self, Self::Stub)
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            Self::Live { .. } => "live",
            Self::Stub => "stub",
        }
    }

    /// Extract a template of exactly `expected_len` dimensions.
    pub fn extract(&self, image: &[u8], expected_len: usize) -> Result<BiometricTemplate, ExtractionError> {
        match self {
            Self::Live { extractor, .. } => {
                let template = extractor.extract(image)?;
                if template.len() != expected_len {
                    return Err(ExtractionError::WrongDimension {
                        expected: expected_len,
                        actual: template.len(),
                    });
                }
                Ok(template)
            }
            Self::Stub => Ok(BiometricTemplate::zeros(expected_len)),
        }
    }
}

impl fmt::Debug for BiometricCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live { tolerance, .. } => f
                .debug_struct("Live")
                .field("tolerance", tolerance)
                .finish_non_exhaustive(),
            Self::Stub => f.write_str("Stub"),
        }
    }
}
