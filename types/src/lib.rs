//! Fundamental types for the idseal identity ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! block hashes, ledger blocks, timestamps, identity keys, biometric templates,
//! ledger parameters, and the validation error they all report.

pub mod block;
pub mod error;
pub mod identity;
pub mod params;
pub mod status;
pub mod time;

pub use block::{Block, BlockHash, ChainTip};
pub use error::ValidationError;
pub use identity::{
    BiometricTemplate, IdentityKey, IdentityPayload, SecondaryIdHash, STATUS_VERIFIED_ORIGINAL,
};
pub use params::{LedgerParams, DEFAULT_TEMPLATE_LEN};
pub use status::{BiometricStatus, IntegrityStatus, Outcome};
pub use time::{Clock, SystemClock, Timestamp};
