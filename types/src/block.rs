//! Block hash and the immutable ledger block.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::{Timestamp, ValidationError};

/// A 32-byte SHA-256 block hash, rendered as 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockHash([u8; 32]);

impl Default for BlockHash {
    fn default() -> Self {
        Self::ZERO
    }
}

impl BlockHash {
    /// The all-zero hash: the genesis predecessor of the first block.
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parse a 64-character hex string (either case).
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        if s.len() != 64 {
            return Err(ValidationError::InvalidHash(s.to_string()));
        }
        let mut out = [0u8; 32];
        for (i, pair) in s.as_bytes().chunks(2).enumerate() {
            let hi = hex_val(pair[0]).ok_or_else(|| ValidationError::InvalidHash(s.to_string()))?;
            let lo = hex_val(pair[1]).ok_or_else(|| ValidationError::InvalidHash(s.to_string()))?;
            out[i] = (hi << 4) | lo;
        }
        Ok(Self(out))
    }

    /// Lowercase hex rendering, the form used in hash inputs and on the wire.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }

    /// Number of leading `'0'` characters in the hex rendering.
    pub fn leading_zero_nibbles(&self) -> u32 {
        let mut count = 0;
        for b in &self.0 {
            if *b == 0 {
                count += 2;
                continue;
            }
            if b >> 4 == 0 {
                count += 1;
            }
            break;
        }
        count
    }
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl FromStr for BlockHash {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// Hashes travel as hex strings in both JSON blocks and bincode records.
impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// One immutable, hash-sealed ledger entry.
///
/// `hash` is the SHA-256 digest of `index || previous_hash || timestamp ||
/// canonical(payload) || nonce` and must carry the ledger's required number of
/// leading zero hex characters. Nothing mutates a block once it is stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the ledger, strictly increasing from 0.
    pub index: u64,
    /// Hash of the predecessor ([`BlockHash::ZERO`] for the first block).
    pub previous_hash: BlockHash,
    /// Captured once before mining; part of the hash input.
    pub timestamp: Timestamp,
    /// Application record. Hashed in canonical (sorted-key) form.
    pub payload: serde_json::Value,
    /// Proof-of-work nonce.
    pub nonce: u64,
    /// Digest over the five fields above.
    pub hash: BlockHash,
}

impl Block {
    /// Whether this is the first block of the ledger.
    pub fn is_first(&self) -> bool {
        self.index == 0
    }
}

/// The head of the ledger that the next block links to.
///
/// An empty ledger has the genesis sentinel as its tip: logical index −1 and the
/// all-zero hash, so the first real block gets index 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainTip {
    Genesis,
    Block { index: u64, hash: BlockHash },
}

impl ChainTip {
    /// Tip for the result of a "last block" lookup.
    pub fn from_last(last: Option<&Block>) -> Self {
        match last {
            Some(block) => Self::Block {
                index: block.index,
                hash: block.hash,
            },
            None => Self::Genesis,
        }
    }

    /// Logical index of the tip; −1 for genesis.
    pub fn index(&self) -> i64 {
        match self {
            Self::Genesis => -1,
            Self::Block { index, .. } => *index as i64,
        }
    }

    /// Index the next appended block must carry.
    pub fn next_index(&self) -> u64 {
        match self {
            Self::Genesis => 0,
            Self::Block { index, .. } => index + 1,
        }
    }

    /// Hash the next block must reference as `previous_hash`.
    pub fn hash(&self) -> BlockHash {
        match self {
            Self::Genesis => BlockHash::ZERO,
            Self::Block { hash, .. } => *hash,
        }
    }
}
