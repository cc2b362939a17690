//! Block and chain verification.

use rayon::prelude::*;

use idseal_crypto::recompute_block_hash;
use idseal_store::BlockStore;
use idseal_types::{Block, BlockHash, ChainTip, IntegrityStatus};
use idseal_work::Difficulty;

use crate::chain::{ChainFault, ChainReport};
use crate::LedgerError;

/// Outcome of recomputing one block's hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockIntegrity {
    Passed,
    /// The recorded fields no longer hash to the recorded hash.
    Failed { recorded: BlockHash, recomputed: BlockHash },
}

impl BlockIntegrity {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    pub fn status(&self) -> IntegrityStatus {
        match self {
            Self::Passed => IntegrityStatus::Passed,
            Self::Failed { .. } => IntegrityStatus::Failed,
        }
    }
}

/// Recomputes block hashes with the same canonicalization and digest the
/// miner uses.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntegrityVerifier {
    difficulty: Difficulty,
}

impl IntegrityVerifier {
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    /// Check one block's self-hash.
    ///
    /// Does not look at `previous_hash` linkage or the difficulty predicate.
    pub fn verify(&self, block: &Block) -> BlockIntegrity {
        let recomputed = recompute_block_hash(block);
        if recomputed == block.hash {
            BlockIntegrity::Passed
        } else {
            tracing::warn!(
                index = block.index,
                recorded = %block.hash,
                %recomputed,
                "block hash mismatch"
            );
            BlockIntegrity::Failed {
                recorded: block.hash,
                recomputed,
            }
        }
    }

    /// Walk a ledger in index order and report the first faulty block.
    ///
    /// Self-hash and work checks run in parallel; the index/link walk is
    /// sequential.
    pub fn verify_chain(&self, blocks: &[Block]) -> ChainReport {
        let self_faults: Vec<Option<ChainFault>> = blocks
            .par_iter()
            .map(|block| self.self_fault(block))
            .collect();

        let mut tip = ChainTip::Genesis;
        for (block, fault) in blocks.iter().zip(self_faults) {
            let expected_index = tip.next_index();
            if block.index != expected_index {
                return ChainReport::failed_at(
                    expected_index,
                    ChainFault::IndexGap {
                        expected: expected_index,
                        actual: block.index,
                    },
                );
            }
            if let Some(fault) = fault {
                return ChainReport::failed_at(block.index, fault);
            }
            if block.previous_hash != tip.hash() {
                return ChainReport::failed_at(
                    block.index,
                    ChainFault::BrokenLink {
                        expected: tip.hash(),
                        actual: block.previous_hash,
                    },
                );
            }
            tip = ChainTip::from_last(Some(block));
        }

        ChainReport::Passed {
            blocks: blocks.len() as u64,
        }
    }

    /// [`Self::verify_chain`] over every block in a store.
    pub fn verify_store<S: BlockStore + ?Sized>(&self, store: &S) -> Result<ChainReport, LedgerError> {
        let blocks = store.iter_blocks()?;
        let report = self.verify_chain(&blocks);
        match &report {
            ChainReport::Passed { blocks } => tracing::info!(blocks, "ledger chain verified"),
            ChainReport::FailedAt { index, fault } => {
                tracing::warn!(index, %fault, "ledger chain verification failed")
            }
        }
        Ok(report)
    }

    fn self_fault(&self, block: &Block) -> Option<ChainFault> {
        let recomputed = recompute_block_hash(block);
        if recomputed != block.hash {
            return Some(ChainFault::HashMismatch {
                recorded: block.hash,
                recomputed,
            });
        }
        if !self.difficulty.is_met_by(&block.hash) {
            return Some(ChainFault::InsufficientWork {
                required: self.difficulty.zeros(),
                actual: block.hash.leading_zero_nibbles(),
            });
        }
        None
    }
}
