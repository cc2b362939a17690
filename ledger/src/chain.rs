//! Whole-chain verification report.

use std::fmt;

use idseal_types::BlockHash;

/// Why a block broke the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainFault {
    /// Stored hash differs from the recomputed hash.
    HashMismatch { recorded: BlockHash, recomputed: BlockHash },
    /// Hash lacks the required zero prefix.
    InsufficientWork { required: u8, actual: u32 },
    /// A block is missing or out of order.
    IndexGap { expected: u64, actual: u64 },
    /// `previous_hash` does not match the predecessor's hash.
    BrokenLink { expected: BlockHash, actual: BlockHash },
}

impl fmt::Display for ChainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HashMismatch { recorded, recomputed } => {
                write!(f, "hash mismatch: recorded {recorded}, recomputed {recomputed}")
            }
            Self::InsufficientWork { required, actual } => {
                write!(f, "insufficient work: {actual} leading zeros, {required} required")
            }
            Self::IndexGap { expected, actual } => {
                write!(f, "index gap: expected {expected}, found {actual}")
            }
            Self::BrokenLink { expected, actual } => {
                write!(f, "broken link: expected previous {expected}, found {actual}")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainReport {
    Passed { blocks: u64 },
    FailedAt { index: u64, fault: ChainFault },
}

impl ChainReport {
    pub(crate) fn failed_at(index: u64, fault: ChainFault) -> Self {
        Self::FailedAt { index, fault }
    }

    pub fn passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }
}

impl fmt::Display for ChainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed { blocks } => write!(f, "PASSED ({blocks} blocks)"),
            Self::FailedAt { index, fault } => write!(f, "FAILED at block {index}: {fault}"),
        }
    }
}
