//! Abstract storage traits for the idseal identity ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.

pub mod audit;
pub mod block;
pub mod error;
pub mod identity;
pub mod registration;

pub use audit::{AuditEntry, AuditStore};
pub use block::{check_append, BlockStore};
pub use error::{Conflict, StoreError};
pub use identity::{IdentityRecord, IdentityStore, RegistrationMetadata};
pub use registration::{LedgerStore, RegistrationStore};
