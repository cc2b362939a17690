//! Difficulty predicate: a required count of leading zero hex characters.

use std::fmt;

use idseal_types::{BlockHash, ValidationError};

/// Required number of leading `'0'` hex characters in a block hash.
///
/// Each extra character multiplies the expected number of attempts by 16.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Difficulty(u8);

impl Difficulty {
    /// Prefix `"00"`: about 256 attempts per block.
    pub const DEFAULT: Self = Self(2);

    /// Every hash qualifies.
    pub const NONE: Self = Self(0);

    pub fn new(zeros: u8) -> Result<Self, ValidationError> {
        if zeros > 64 {
            return Err(ValidationError::DifficultyOutOfRange(zeros));
        }
        Ok(Self(zeros))
    }

    pub fn zeros(&self) -> u8 {
        self.0
    }

    /// Whether `hash` carries the required zero prefix.
    pub fn is_met_by(&self, hash: &BlockHash) -> bool {
        hash.leading_zero_nibbles() >= u32::from(self.0)
    }

    /// Mean number of attempts to find a qualifying nonce (16^zeros).
    pub fn expected_attempts(&self) -> f64 {
        16f64.powi(i32::from(self.0))
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_two_zero_prefix() {
        assert_eq!(Difficulty::default().zeros(), 2);
        assert_eq!(Difficulty::DEFAULT.expected_attempts(), 256.0);
    }

    #[test]
    fn out_of_range_rejected() {
        assert!(Difficulty::new(64).is_ok());
        assert_eq!(
            Difficulty::new(65),
            Err(ValidationError::DifficultyOutOfRange(65))
        );
    }

    #[test]
    fn predicate_checks_prefix() {
        let mut bytes = [0xffu8; 32];
        bytes[0] = 0x00;
        let hash = BlockHash::new(bytes);
        assert!(Difficulty::new(2).unwrap().is_met_by(&hash));
        assert!(!Difficulty::new(3).unwrap().is_met_by(&hash));
        assert!(Difficulty::NONE.is_met_by(&BlockHash::new([0xff; 32])));
    }
}
