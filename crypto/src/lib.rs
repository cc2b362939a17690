//! Cryptographic primitives for the idseal ledger.
//!
//! - **SHA-256** for block hashes and the one-way hash of secondary identifiers
//! - Canonical (sorted-key) JSON rendering of block payloads, so that a payload
//!   always hashes the same regardless of how its map was built

pub mod hash;

pub use hash::{
    canonical_payload, hash_block_fields, hash_secondary_id, recompute_block_hash, sha256,
    sha256_hex, BlockPreimage,
};
