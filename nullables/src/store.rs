//! Nullable store: thread-safe in-memory ledger for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use idseal_store::{
    check_append, AuditEntry, AuditStore, BlockStore, Conflict, IdentityRecord, IdentityStore,
    RegistrationStore, StoreError,
};
use idseal_types::{Block, BlockHash, ChainTip, IdentityKey};

#[derive(Default)]
struct Inner {
    /// Position `i` holds the block with index `i`.
    blocks: Vec<Block>,
    by_hash: HashMap<BlockHash, usize>,
    identities: HashMap<String, IdentityRecord>,
    audit: Vec<AuditEntry>,
    fail_identity_writes: bool,
    fail_audit_writes: bool,
    fail_reads: bool,
}

impl Inner {
    fn tip(&self) -> ChainTip {
        ChainTip::from_last(self.blocks.last())
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if self.fail_reads {
            return Err(StoreError::Backend("injected read failure".into()));
        }
        Ok(())
    }

    fn check_block(&self, block: &Block) -> Result<(), StoreError> {
        let exists = self.by_hash.contains_key(&block.hash);
        Ok(check_append(&self.tip(), block, exists)?)
    }

    fn push_block(&mut self, block: &Block) {
        self.by_hash.insert(block.hash, self.blocks.len());
        self.blocks.push(block.clone());
    }
}

/// An in-memory implementation of every ledger store trait.
///
/// All state sits behind one mutex, so each operation (including
/// [`RegistrationStore::commit_registration`]) is atomic. Failures can be
/// injected per write path to exercise rollback.
#[derive(Default)]
pub struct NullStore {
    inner: Mutex<Inner>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make identity writes (and therefore registrations) fail.
    pub fn fail_identity_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_identity_writes = fail;
    }

    /// Make audit appends fail.
    pub fn fail_audit_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_audit_writes = fail;
    }

    /// Make every read fail with a backend error.
    pub fn fail_reads(&self, fail: bool) {
        self.inner.lock().unwrap().fail_reads = fail;
    }

    /// Overwrite fields of a stored block in place, bypassing every check.
    ///
    /// Simulates tampering with the persisted ledger. The block stays indexed
    /// under its original hash.
    pub fn tamper_block(&self, index: u64, edit: impl FnOnce(&mut Block)) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(block) = inner.blocks.get_mut(index as usize) {
            edit(block);
        }
    }

    /// Insert an identity record with no matching block (legacy import).
    pub fn insert_identity_unchecked(&self, record: IdentityRecord) {
        self.inner
            .lock()
            .unwrap()
            .identities
            .insert(record.key.as_str().to_string(), record);
    }
}

impl BlockStore for NullStore {
    fn append(&self, block: &Block) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_block(block)?;
        inner.push_block(block);
        Ok(())
    }

    fn get_last(&self) -> Result<Option<Block>, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner.check_reads()?;
        Ok(inner.blocks.last().cloned())
    }

    fn get_by_hash(&self, hash: &BlockHash) -> Result<Block, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner.check_reads()?;
        inner
            .by_hash
            .get(hash)
            .map(|&pos| inner.blocks[pos].clone())
            .ok_or_else(|| StoreError::NotFound(format!("block {hash}")))
    }

    fn get_by_index(&self, index: u64) -> Result<Block, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner.check_reads()?;
        inner
            .blocks
            .get(index as usize)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("block index {index}")))
    }

    fn exists(&self, hash: &BlockHash) -> Result<bool, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner.check_reads()?;
        Ok(inner.by_hash.contains_key(hash))
    }

    fn block_count(&self) -> Result<u64, StoreError> {
        Ok(self.inner.lock().unwrap().blocks.len() as u64)
    }

    fn iter_blocks(&self) -> Result<Vec<Block>, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner.check_reads()?;
        Ok(inner.blocks.clone())
    }
}

impl IdentityStore for NullStore {
    fn get_identity(&self, key: &IdentityKey) -> Result<IdentityRecord, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner.check_reads()?;
        inner
            .identities
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("identity {key}")))
    }

    fn identity_exists(&self, key: &IdentityKey) -> Result<bool, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner.check_reads()?;
        Ok(inner.identities.contains_key(key.as_str()))
    }

    fn identity_count(&self) -> Result<u64, StoreError> {
        Ok(self.inner.lock().unwrap().identities.len() as u64)
    }
}

impl RegistrationStore for NullStore {
    fn commit_registration(&self, block: &Block, record: &IdentityRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        // Every check runs before the first write.
        inner.check_block(block)?;
        if inner.identities.contains_key(record.key.as_str()) {
            return Err(Conflict::DuplicateKey(record.key.to_string()).into());
        }
        if inner.fail_identity_writes {
            return Err(StoreError::Backend("injected identity write failure".into()));
        }
        inner.push_block(block);
        inner
            .identities
            .insert(record.key.as_str().to_string(), record.clone());
        Ok(())
    }
}

impl AuditStore for NullStore {
    fn append_audit(&self, entry: &AuditEntry) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_audit_writes {
            return Err(StoreError::Backend("injected audit write failure".into()));
        }
        let sequence = inner.audit.len() as u64;
        let mut stored = entry.clone();
        stored.sequence = sequence;
        inner.audit.push(stored);
        Ok(sequence)
    }

    fn iter_audit(&self) -> Result<Vec<AuditEntry>, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner.check_reads()?;
        Ok(inner.audit.clone())
    }
}
