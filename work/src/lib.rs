//! Proof-of-work block mining.
//!
//! A block is sealed by searching for a nonce whose SHA-256 block hash starts
//! with a required number of zero hex characters. The search is single-threaded
//! and deterministic for a fixed timestamp, so a sealed block can always be
//! recomputed and checked later.
//!
//! Mining has no upper bound on attempts. Callers must run it away from any
//! latency-sensitive path and give it a [`MiningBudget`].

pub mod difficulty;
pub mod error;
pub mod miner;
pub mod validator;

pub use difficulty::Difficulty;
pub use error::WorkError;
pub use miner::{BlockMiner, MiningBudget};
pub use validator::{meets_difficulty, validate_work};
