//! LMDB implementation of BlockStore.

use heed::RoTxn;

use idseal_store::{BlockStore, StoreError};
use idseal_types::{Block, BlockHash};

use crate::environment::LmdbEnvironment;
use crate::write_batch::decode_u64;
use crate::LmdbError;

pub(crate) fn read_block(
    env: &LmdbEnvironment,
    txn: &RoTxn,
    hash: &BlockHash,
) -> Result<Option<Block>, LmdbError> {
    match env.blocks_db.get(txn, hash.as_bytes().as_slice())? {
        Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
        None => Ok(None),
    }
}

fn hash_from_bytes(bytes: &[u8]) -> Result<BlockHash, LmdbError> {
    let arr: [u8; 32] = bytes
        .try_into()
        .map_err(|_| LmdbError::Serialization(format!("expected 32-byte hash, got {}", bytes.len())))?;
    Ok(BlockHash::new(arr))
}

/// The maximum-index block visible to `txn`.
pub(crate) fn read_last(env: &LmdbEnvironment, txn: &RoTxn) -> Result<Option<Block>, LmdbError> {
    let Some((_, hash_bytes)) = env.block_index_db.last(txn)? else {
        return Ok(None);
    };
    let hash = hash_from_bytes(hash_bytes)?;
    match read_block(env, txn, &hash)? {
        Some(block) => Ok(Some(block)),
        None => Err(LmdbError::Serialization(format!(
            "block index points at missing block {hash}"
        ))),
    }
}

impl BlockStore for LmdbEnvironment {
    fn append(&self, block: &Block) -> Result<(), StoreError> {
        let mut batch = self.write_batch()?;
        batch.append_block(block)?;
        batch.commit()?;
        tracing::debug!(index = block.index, hash = %block.hash, "block appended");
        Ok(())
    }

    fn get_last(&self) -> Result<Option<Block>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        Ok(read_last(self, &rtxn)?)
    }

    fn get_by_hash(&self, hash: &BlockHash) -> Result<Block, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        read_block(self, &rtxn, hash)?
            .ok_or_else(|| StoreError::NotFound(format!("block {hash}")))
    }

    fn get_by_index(&self, index: u64) -> Result<Block, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let hash_bytes = self
            .block_index_db
            .get(&rtxn, &index.to_be_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(format!("block index {index}")))?;
        let hash = hash_from_bytes(hash_bytes)?;
        read_block(self, &rtxn, &hash)?
            .ok_or_else(|| StoreError::Corruption(format!("block index {index} points at missing block {hash}")))
    }

    fn exists(&self, hash: &BlockHash) -> Result<bool, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let found = self
            .blocks_db
            .get(&rtxn, hash.as_bytes().as_slice())
            .map_err(LmdbError::from)?;
        Ok(found.is_some())
    }

    fn block_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        Ok(self.block_index_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn iter_blocks(&self) -> Result<Vec<Block>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let mut blocks = Vec::new();
        for item in self.block_index_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (index_bytes, hash_bytes) = item.map_err(LmdbError::from)?;
            let index = decode_u64(index_bytes)?;
            let hash = hash_from_bytes(hash_bytes)?;
            let block = read_block(self, &rtxn, &hash)?.ok_or_else(|| {
                StoreError::Corruption(format!("block index {index} points at missing block {hash}"))
            })?;
            blocks.push(block);
        }
        Ok(blocks)
    }
}
