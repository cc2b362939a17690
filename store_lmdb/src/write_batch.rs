//! Write batching: groups store operations into a single LMDB write
//! transaction.
//!
//! # Usage
//!
//! ```ignore
//! let mut batch = env.write_batch()?;
//! batch.append_block(&block)?;
//! batch.insert_identity(&record)?;
//! batch.commit()?;
//! ```
//!
//! If the batch is dropped without calling [`WriteBatch::commit`], all
//! operations are rolled back (the underlying LMDB transaction is aborted).
//! LMDB allows one write transaction at a time, so the checks a batch makes
//! against the current tip cannot race with another writer.

use heed::RwTxn;

use idseal_store::{check_append, AuditEntry, Conflict, IdentityRecord, StoreError};
use idseal_types::{Block, ChainTip};

use crate::block::{read_block, read_last};
use crate::environment::LmdbEnvironment;
use crate::LmdbError;

pub struct WriteBatch<'a> {
    txn: RwTxn<'a>,
    env: &'a LmdbEnvironment,
}

impl<'a> WriteBatch<'a> {
    pub(crate) fn new(env: &'a LmdbEnvironment) -> Result<Self, LmdbError> {
        let txn = env.env().write_txn()?;
        Ok(Self { txn, env })
    }

    /// Tip as seen by this transaction, including its own uncommitted appends.
    pub fn tip(&self) -> Result<ChainTip, StoreError> {
        let last = read_last(self.env, &self.txn)?;
        Ok(ChainTip::from_last(last.as_ref()))
    }

    // ── Blocks ──────────────────────────────────────────────────────────

    /// Append a block after checking hash uniqueness and index/link order.
    pub fn append_block(&mut self, block: &Block) -> Result<(), StoreError> {
        let exists = read_block(self.env, &self.txn, &block.hash)?.is_some();
        let tip = self.tip()?;
        if let Err(conflict) = check_append(&tip, block, exists) {
            tracing::warn!(index = block.index, hash = %block.hash, %conflict, "append rejected");
            return Err(conflict.into());
        }

        let bytes = serde_json::to_vec(block).map_err(LmdbError::from)?;
        self.env
            .blocks_db
            .put(&mut self.txn, block.hash.as_bytes().as_slice(), &bytes)
            .map_err(LmdbError::from)?;
        self.env
            .block_index_db
            .put(
                &mut self.txn,
                &block.index.to_be_bytes(),
                block.hash.as_bytes().as_slice(),
            )
            .map_err(LmdbError::from)?;
        Ok(())
    }

    // ── Identities ──────────────────────────────────────────────────────

    /// Insert an identity record. Existing keys are a conflict.
    pub fn insert_identity(&mut self, record: &IdentityRecord) -> Result<(), StoreError> {
        let key = record.key.as_str().as_bytes();
        let existing = self
            .env
            .identities_db
            .get(&self.txn, key)
            .map_err(LmdbError::from)?;
        if existing.is_some() {
            return Err(Conflict::DuplicateKey(record.key.to_string()).into());
        }

        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        self.env
            .identities_db
            .put(&mut self.txn, key, &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    // ── Audit ───────────────────────────────────────────────────────────

    /// Append an audit entry under the next sequence number.
    pub fn append_audit(&mut self, entry: &AuditEntry) -> Result<u64, StoreError> {
        let next = match self.env.audit_db.last(&self.txn).map_err(LmdbError::from)? {
            Some((key, _)) => decode_u64(key)? + 1,
            None => 0,
        };
        let mut stored = entry.clone();
        stored.sequence = next;
        let bytes = bincode::serialize(&stored).map_err(LmdbError::from)?;
        self.env
            .audit_db
            .put(&mut self.txn, &next.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        Ok(next)
    }

    // ── Commit / rollback ───────────────────────────────────────────────

    pub fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

pub(crate) fn decode_u64(bytes: &[u8]) -> Result<u64, LmdbError> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| LmdbError::Serialization(format!("expected 8-byte key, got {}", bytes.len())))?;
    Ok(u64::from_be_bytes(arr))
}
