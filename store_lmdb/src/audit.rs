//! LMDB implementation of AuditStore.

use idseal_store::{AuditEntry, AuditStore, StoreError};

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

impl AuditStore for LmdbEnvironment {
    fn append_audit(&self, entry: &AuditEntry) -> Result<u64, StoreError> {
        let mut batch = self.write_batch()?;
        let sequence = batch.append_audit(entry)?;
        batch.commit()?;
        Ok(sequence)
    }

    fn iter_audit(&self) -> Result<Vec<AuditEntry>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let mut entries = Vec::new();
        for item in self.audit_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            entries.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(entries)
    }

    fn audit_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        Ok(self.audit_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
