//! Single-threaded block mining.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use idseal_crypto::BlockPreimage;
use idseal_types::{Block, ChainTip, Timestamp};
use serde_json::Value;

use crate::{Difficulty, WorkError};

/// Attempts between deadline/cancellation checks.
const BATCH_SIZE: u64 = 4096;

/// Limits applied to one mining run.
///
/// Mining is CPU-bound with unbounded worst-case latency. A budget turns a
/// runaway search into a `Cancelled` or `DeadlineExceeded` error instead of a
/// hung caller.
#[derive(Clone, Debug, Default)]
pub struct MiningBudget {
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
}

impl MiningBudget {
    /// No deadline and no cancellation.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Abort once `flag` is set (checked every few thousand attempts).
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Whether the cancel flag has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn check(&self, attempts: u64, started: Instant) -> Result<(), WorkError> {
        if self.is_cancelled() {
            return Err(WorkError::Cancelled { attempts });
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(WorkError::DeadlineExceeded {
                    attempts,
                    elapsed: started.elapsed(),
                });
            }
        }
        Ok(())
    }
}

/// Builds new blocks by searching for a nonce that satisfies the difficulty.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockMiner {
    difficulty: Difficulty,
}

impl BlockMiner {
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Mine a block on top of `tip` with no budget.
    pub fn mine(&self, payload: Value, tip: &ChainTip, timestamp: Timestamp) -> Result<Block, WorkError> {
        self.mine_with(payload, tip, timestamp, &MiningBudget::unbounded())
    }

    /// Mine a block on top of `tip`.
    ///
    /// `timestamp` is fixed for the whole search so every attempt hashes the
    /// same preimage apart from the nonce. Nonces are tried from 0 upwards.
    pub fn mine_with(
        &self,
        payload: Value,
        tip: &ChainTip,
        timestamp: Timestamp,
        budget: &MiningBudget,
    ) -> Result<Block, WorkError> {
        let index = tip.next_index();
        let previous_hash = tip.hash();
        let preimage = BlockPreimage::new(index, &previous_hash, timestamp, &payload);
        let started = Instant::now();

        let mut nonce: u64 = 0;
        loop {
            if nonce % BATCH_SIZE == 0 {
                budget.check(nonce, started)?;
            }

            let hash = preimage.hash_with_nonce(nonce);
            if self.difficulty.is_met_by(&hash) {
                tracing::debug!(
                    index,
                    nonce,
                    %hash,
                    difficulty = self.difficulty.zeros(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "block mined"
                );
                return Ok(Block {
                    index,
                    previous_hash,
                    timestamp,
                    payload,
                    nonce,
                    hash,
                });
            }

            nonce = nonce
                .checked_add(1)
                .ok_or(WorkError::NonceSpaceExhausted(self.difficulty.zeros()))?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idseal_crypto::recompute_block_hash;
    use idseal_types::BlockHash;
    use serde_json::json;

    fn ts() -> Timestamp {
        Timestamp::from_millis(1_700_000_000_000)
    }

    #[test]
    fn first_block_links_to_genesis() {
        let miner = BlockMiner::new(Difficulty::DEFAULT);
        let block = miner.mine(json!({"name": "A"}), &ChainTip::Genesis, ts()).unwrap();

        assert_eq!(block.index, 0);
        assert_eq!(block.previous_hash, BlockHash::ZERO);
        assert!(block.hash.to_hex().starts_with("00"));
        assert_eq!(recompute_block_hash(&block), block.hash);
    }

    #[test]
    fn next_block_links_to_tip() {
        let miner = BlockMiner::new(Difficulty::DEFAULT);
        let first = miner.mine(json!({"n": 1}), &ChainTip::Genesis, ts()).unwrap();
        let tip = ChainTip::from_last(Some(&first));
        let second = miner.mine(json!({"n": 2}), &tip, ts()).unwrap();

        assert_eq!(second.index, 1);
        assert_eq!(second.previous_hash, first.hash);
    }

    #[test]
    fn mining_is_deterministic_for_fixed_inputs() {
        let miner = BlockMiner::new(Difficulty::DEFAULT);
        let a = miner.mine(json!({"k": "v"}), &ChainTip::Genesis, ts()).unwrap();
        let b = miner.mine(json!({"k": "v"}), &ChainTip::Genesis, ts()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_difficulty_takes_first_nonce() {
        let miner = BlockMiner::new(Difficulty::NONE);
        let block = miner.mine(json!({}), &ChainTip::Genesis, ts()).unwrap();
        assert_eq!(block.nonce, 0);
    }

    #[test]
    fn pre_cancelled_budget_stops_immediately() {
        let flag = Arc::new(AtomicBool::new(true));
        let budget = MiningBudget::unbounded().with_cancel(flag);
        let miner = BlockMiner::new(Difficulty::new(64).unwrap());

        let err = miner
            .mine_with(json!({}), &ChainTip::Genesis, ts(), &budget)
            .unwrap_err();
        assert!(matches!(err, WorkError::Cancelled { attempts: 0 }));
    }

    #[test]
    fn expired_deadline_aborts_search() {
        let budget = MiningBudget::unbounded().with_deadline(Instant::now());
        let miner = BlockMiner::new(Difficulty::new(64).unwrap());

        let err = miner
            .mine_with(json!({}), &ChainTip::Genesis, ts(), &budget)
            .unwrap_err();
        assert!(matches!(err, WorkError::DeadlineExceeded { .. }));
    }
}
