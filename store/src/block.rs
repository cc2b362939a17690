//! Ledger block storage trait.

use crate::{Conflict, StoreError};
use idseal_types::{Block, BlockHash, ChainTip};

/// Append-only storage for ledger blocks.
pub trait BlockStore {
    /// Append a block to the end of the ledger.
    ///
    /// Fails with [`Conflict`] if the hash is already stored, the index is not
    /// the current tip's successor, or `previous_hash` is not the tip's hash.
    fn append(&self, block: &Block) -> Result<(), StoreError>;

    /// The maximum-index block, or `None` for an empty ledger.
    fn get_last(&self) -> Result<Option<Block>, StoreError>;

    fn get_by_hash(&self, hash: &BlockHash) -> Result<Block, StoreError>;

    fn get_by_index(&self, index: u64) -> Result<Block, StoreError>;

    fn exists(&self, hash: &BlockHash) -> Result<bool, StoreError>;

    fn block_count(&self) -> Result<u64, StoreError>;

    /// All blocks in ascending index order.
    fn iter_blocks(&self) -> Result<Vec<Block>, StoreError>;

    /// The tip the next appended block must link to.
    fn tip(&self) -> Result<ChainTip, StoreError> {
        Ok(ChainTip::from_last(self.get_last()?.as_ref()))
    }
}

/// Ordering and uniqueness rules every backend applies before an append.
///
/// Backends call this inside the same critical section (write transaction or
/// lock) that performs the insert.
pub fn check_append(tip: &ChainTip, block: &Block, hash_exists: bool) -> Result<(), Conflict> {
    if hash_exists {
        return Err(Conflict::DuplicateHash(block.hash));
    }
    let expected = tip.next_index();
    if block.index != expected {
        return Err(Conflict::IndexOutOfOrder {
            expected,
            actual: block.index,
        });
    }
    if block.previous_hash != tip.hash() {
        return Err(Conflict::StaleTip { tip: tip.hash() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use idseal_types::Timestamp;

    fn block(index: u64, previous_hash: BlockHash, tag: u8) -> Block {
        Block {
            index,
            previous_hash,
            timestamp: Timestamp::EPOCH,
            payload: serde_json::json!({}),
            nonce: 0,
            hash: BlockHash::new([tag; 32]),
        }
    }

    #[test]
    fn first_block_must_be_index_zero_on_zero_hash() {
        let ok = block(0, BlockHash::ZERO, 1);
        assert!(check_append(&ChainTip::Genesis, &ok, false).is_ok());

        let gap = block(1, BlockHash::ZERO, 1);
        assert_eq!(
            check_append(&ChainTip::Genesis, &gap, false),
            Err(Conflict::IndexOutOfOrder { expected: 0, actual: 1 })
        );
    }

    #[test]
    fn duplicate_hash_is_rejected_first() {
        let b = block(0, BlockHash::ZERO, 1);
        assert_eq!(
            check_append(&ChainTip::Genesis, &b, true),
            Err(Conflict::DuplicateHash(b.hash))
        );
    }

    #[test]
    fn stale_link_is_rejected() {
        let tip = ChainTip::Block {
            index: 0,
            hash: BlockHash::new([1; 32]),
        };
        let b = block(1, BlockHash::new([9; 32]), 2);
        assert!(matches!(
            check_append(&tip, &b, false),
            Err(Conflict::StaleTip { .. })
        ));
    }
}
