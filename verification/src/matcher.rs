//! Name and biometric matching.

use idseal_types::{BiometricTemplate, ValidationError};

use crate::BiometricCapabilities;

/// Similarity of two names on a 0–100 scale, ignoring case.
///
/// Ratcliff/Obershelp: twice the number of characters in matching blocks over
/// the total length of both names. Two empty names score 100.
pub fn name_similarity(stored: &str, claimed: &str) -> u8 {
    let a: Vec<char> = stored.to_lowercase().chars().collect();
    let b: Vec<char> = claimed.to_lowercase().chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }
    let matched = matching_chars(&a, &b);
    let ratio = 2.0 * matched as f64 / total as f64;
    (ratio * 100.0).round() as u8
}

/// Characters covered by the recursive longest-common-block decomposition.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    total
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    // run[j] = length of the common run ending at (i - 1, j - 1)
    let mut prev = vec![0usize; bhi - blo + 1];
    let mut cur = vec![0usize; bhi - blo + 1];
    for i in alo..ahi {
        for j in blo..bhi {
            let slot = j - blo + 1;
            if a[i] == b[j] {
                let k = prev[slot - 1] + 1;
                cur[slot] = k;
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            } else {
                cur[slot] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    (best_i, best_j, best_k)
}

/// Euclidean distance between two templates of equal length.
pub fn biometric_distance(
    stored: &BiometricTemplate,
    live: &BiometricTemplate,
) -> Result<f64, ValidationError> {
    if stored.len() != live.len() {
        return Err(ValidationError::TemplateLengthMismatch {
            left: stored.len(),
            right: live.len(),
        });
    }
    let sum: f64 = stored
        .as_slice()
        .iter()
        .zip(live.as_slice())
        .map(|(x, y)| (x - y) * (x - y))
        .sum();
    Ok(sum.sqrt())
}

/// Result of one biometric comparison.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiometricComparison {
    pub distance: f64,
    pub matched: bool,
}

/// Applies the name threshold and the biometric capability set.
#[derive(Clone)]
pub struct IdentityMatcher {
    name_threshold: u8,
    capabilities: BiometricCapabilities,
}

impl IdentityMatcher {
    pub fn new(name_threshold: u8, capabilities: BiometricCapabilities) -> Self {
        Self {
            name_threshold,
            capabilities,
        }
    }

    pub fn capabilities(&self) -> &BiometricCapabilities {
        &self.capabilities
    }

    /// Similarity score and whether it reaches the threshold.
    pub fn match_name(&self, stored: &str, claimed: &str) -> (u8, bool) {
        let score = name_similarity(stored, claimed);
        (score, score >= self.name_threshold)
    }

    /// Compare templates. A match requires `distance < tolerance`.
    ///
    /// In stub mode the comparison is skipped and always matches at distance 0.
    pub fn match_biometrics(
        &self,
        stored: &BiometricTemplate,
        live: &BiometricTemplate,
    ) -> Result<BiometricComparison, ValidationError> {
        match &self.capabilities {
            BiometricCapabilities::Live { tolerance, .. } => {
                let distance = biometric_distance(stored, live)?;
                Ok(BiometricComparison {
                    distance,
                    matched: distance < *tolerance,
                })
            }
            BiometricCapabilities::Stub => Ok(BiometricComparison {
                distance: 0.0,
                matched: true,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonTemplateExtractor;
    use std::sync::Arc;

    fn template(values: &[f64]) -> BiometricTemplate {
        BiometricTemplate::new(values.to_vec()).unwrap()
    }

    fn live(tolerance: f64) -> IdentityMatcher {
        IdentityMatcher::new(
            80,
            BiometricCapabilities::Live {
                extractor: Arc::new(JsonTemplateExtractor),
                tolerance,
            },
        )
    }

    #[test]
    fn identical_names_score_100() {
        assert_eq!(name_similarity("John Smith", "John Smith"), 100);
        assert_eq!(name_similarity("Asha Rao", "asha rao"), 100);
        assert_eq!(name_similarity("", ""), 100);
    }

    #[test]
    fn different_names_score_low() {
        assert_eq!(name_similarity("John Smith", "Jane Doe"), 22);
        assert_eq!(name_similarity("a", ""), 0);
    }

    #[test]
    fn small_typos_stay_above_threshold() {
        assert_eq!(name_similarity("John Smith", "Jon Smith"), 95);
        assert_eq!(name_similarity("aadhaar", "adhar"), 83);
        assert_eq!(name_similarity("asha rao", "asha r"), 86);
    }

    #[test]
    fn reordered_words_fall_below_threshold() {
        assert_eq!(name_similarity("John Smith", "Smith John"), 50);
    }

    #[test]
    fn threshold_is_inclusive() {
        let matcher = IdentityMatcher::new(83, BiometricCapabilities::Stub);
        assert_eq!(matcher.match_name("aadhaar", "adhar"), (83, true));
        let matcher = IdentityMatcher::new(84, BiometricCapabilities::Stub);
        assert_eq!(matcher.match_name("aadhaar", "adhar"), (83, false));
    }

    #[test]
    fn distance_to_self_is_zero() {
        let v = template(&[0.1, -0.4, 0.9]);
        assert_eq!(biometric_distance(&v, &v).unwrap(), 0.0);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = template(&[0.0, 0.0]);
        let b = template(&[3.0, 4.0]);
        assert_eq!(biometric_distance(&a, &b).unwrap(), 5.0);
    }

    #[test]
    fn unequal_lengths_are_validation_errors() {
        let err = biometric_distance(&template(&[0.0]), &template(&[0.0, 1.0])).unwrap_err();
        assert_eq!(err, ValidationError::TemplateLengthMismatch { left: 1, right: 2 });
    }

    #[test]
    fn tolerance_is_exclusive() {
        let matcher = live(0.5);
        let a = template(&[0.0]);
        assert!(matcher.match_biometrics(&a, &template(&[0.49])).unwrap().matched);
        assert!(!matcher.match_biometrics(&a, &template(&[0.5])).unwrap().matched);
    }

    #[test]
    fn stub_always_matches() {
        let matcher = IdentityMatcher::new(80, BiometricCapabilities::Stub);
        let result = matcher
            .match_biometrics(&template(&[0.0]), &template(&[9.0, 9.0]))
            .unwrap();
        assert_eq!(result, BiometricComparison { distance: 0.0, matched: true });
    }
}
