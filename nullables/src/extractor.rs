//! Nullable biometric extractor.

use std::collections::HashMap;
use std::sync::Mutex;

use idseal_types::BiometricTemplate;
use idseal_verification::{ExtractionError, FeatureExtractor};

/// Returns programmed templates per image, or a fixed failure.
///
/// Unknown images yield [`ExtractionError::NoFaceDetected`].
#[derive(Default)]
pub struct NullExtractor {
    templates: Mutex<HashMap<Vec<u8>, BiometricTemplate>>,
    failure: Mutex<Option<ExtractionError>>,
}

impl NullExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `image` extract to `template`.
    pub fn with_template(self, image: &[u8], template: BiometricTemplate) -> Self {
        self.templates.lock().unwrap().insert(image.to_vec(), template);
        self
    }

    /// Fail every extraction with `error` until cleared.
    pub fn fail_with(&self, error: ExtractionError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap() = None;
    }
}

impl FeatureExtractor for NullExtractor {
    fn extract(&self, image: &[u8]) -> Result<BiometricTemplate, ExtractionError> {
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        self.templates
            .lock()
            .unwrap()
            .get(image)
            .cloned()
            .ok_or(ExtractionError::NoFaceDetected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn programmed_images_extract() {
        let template = BiometricTemplate::new(vec![0.1, 0.2]).unwrap();
        let extractor = NullExtractor::new().with_template(b"selfie", template.clone());
        assert_eq!(extractor.extract(b"selfie"), Ok(template));
        assert_eq!(extractor.extract(b"other"), Err(ExtractionError::NoFaceDetected));
    }

    #[test]
    fn injected_failure_wins_until_cleared() {
        let template = BiometricTemplate::new(vec![0.1]).unwrap();
        let extractor = NullExtractor::new().with_template(b"selfie", template);
        extractor.fail_with(ExtractionError::InvalidImage("corrupt".into()));
        assert!(extractor.extract(b"selfie").is_err());
        extractor.clear_failure();
        assert!(extractor.extract(b"selfie").is_ok());
    }
}
