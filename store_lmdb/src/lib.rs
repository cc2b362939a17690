//! LMDB storage backend for the idseal identity ledger.
//!
//! Implements every storage trait from `idseal-store` on [`LmdbEnvironment`]
//! using the `heed` LMDB bindings. Blocks are stored as JSON (their payload is
//! a free-form JSON value); identity and audit records as bincode.

pub mod audit;
pub mod block;
pub mod environment;
pub mod error;
pub mod identity;
pub mod integrity;
pub mod write_batch;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use write_batch::WriteBatch;
