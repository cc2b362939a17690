//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::write_batch::WriteBatch;
use crate::LmdbError;

/// Named databases, in creation order.
pub(crate) const DATABASES: &[&str] = &["blocks", "block_index", "identities", "audit", "meta"];

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";
pub(crate) const SCHEMA_VERSION: u32 = 1;

/// Wraps the LMDB environment and all database handles.
///
/// Cloning is cheap: the environment is shared and database handles are
/// plain identifiers.
#[derive(Clone)]
pub struct LmdbEnvironment {
    env: Arc<Env>,
    /// `hash (32 bytes) -> JSON(Block)`
    pub(crate) blocks_db: Database<Bytes, Bytes>,
    /// `index (u64 BE) -> hash`
    pub(crate) block_index_db: Database<Bytes, Bytes>,
    /// `key -> bincode(IdentityRecord)`
    pub(crate) identities_db: Database<Bytes, Bytes>,
    /// `sequence (u64 BE) -> bincode(AuditEntry)`
    pub(crate) audit_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        let mut options = EnvOpenOptions::new();
        options.map_size(map_size).max_dbs(max_dbs);
        // SAFETY: the environment is opened once per path per process and
        // nothing else maps the same data file.
        let env = unsafe { options.open(path) }?;

        let mut wtxn = env.write_txn()?;
        let blocks_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("blocks"))?;
        let block_index_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("block_index"))?;
        let identities_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("identities"))?;
        let audit_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("audit"))?;
        let meta_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("meta"))?;

        if meta_db.get(&wtxn, SCHEMA_VERSION_KEY)?.is_none() {
            meta_db.put(&mut wtxn, SCHEMA_VERSION_KEY, &SCHEMA_VERSION.to_le_bytes())?;
        }
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, max_dbs, "LMDB environment opened");

        Ok(Self {
            env: Arc::new(env),
            blocks_db,
            block_index_db,
            identities_db,
            audit_db,
            meta_db,
        })
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    /// Begin a write batch. Dropping it without `commit` rolls everything back.
    pub fn write_batch(&self) -> Result<WriteBatch<'_>, LmdbError> {
        WriteBatch::new(self)
    }

    /// Schema version recorded when the environment was first created.
    pub fn schema_version(&self) -> Result<u32, LmdbError> {
        let rtxn = self.env.read_txn()?;
        match self.meta_db.get(&rtxn, SCHEMA_VERSION_KEY)? {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    LmdbError::Serialization("schema_version has unexpected byte length".into())
                })?;
                Ok(u32::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }
}
