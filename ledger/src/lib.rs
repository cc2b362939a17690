//! Ledger integrity.
//!
//! A stored block is trusted only if its hash can be recomputed from its own
//! fields. [`IntegrityVerifier::verify`] checks one block in isolation (what a
//! verification needs); [`IntegrityVerifier::verify_chain`] additionally walks
//! the index sequence and `previous_hash` links of the whole ledger.

pub mod chain;
pub mod error;
pub mod integrity;

pub use chain::{ChainFault, ChainReport};
pub use error::LedgerError;
pub use integrity::{BlockIntegrity, IntegrityVerifier};
