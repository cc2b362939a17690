//! LMDB implementation of IdentityStore and RegistrationStore.

use idseal_store::{IdentityRecord, IdentityStore, RegistrationStore, StoreError};
use idseal_types::{Block, IdentityKey};

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

impl IdentityStore for LmdbEnvironment {
    fn get_identity(&self, key: &IdentityKey) -> Result<IdentityRecord, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .identities_db
            .get(&rtxn, key.as_str().as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("identity {key}")))?;
        Ok(bincode::deserialize(bytes).map_err(LmdbError::from)?)
    }

    fn identity_exists(&self, key: &IdentityKey) -> Result<bool, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let found = self
            .identities_db
            .get(&rtxn, key.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        Ok(found.is_some())
    }

    fn identity_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        Ok(self.identities_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}

impl RegistrationStore for LmdbEnvironment {
    fn commit_registration(&self, block: &Block, record: &IdentityRecord) -> Result<(), StoreError> {
        let mut batch = self.write_batch()?;
        batch.append_block(block)?;
        batch.insert_identity(record)?;
        batch.commit()?;
        tracing::debug!(key = %record.key, index = block.index, hash = %block.hash, "registration committed");
        Ok(())
    }
}
