//! PoW validation.

use idseal_crypto::recompute_block_hash;
use idseal_types::{Block, BlockHash};

use crate::Difficulty;

/// Whether a hash satisfies the difficulty predicate.
pub fn meets_difficulty(hash: &BlockHash, difficulty: Difficulty) -> bool {
    difficulty.is_met_by(hash)
}

/// Validate a sealed block: its stored hash must equal the recomputed hash and
/// satisfy the difficulty predicate.
pub fn validate_work(block: &Block, difficulty: Difficulty) -> bool {
    recompute_block_hash(block) == block.hash && meets_difficulty(&block.hash, difficulty)
}
