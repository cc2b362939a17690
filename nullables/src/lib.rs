//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies (clock, storage, biometric extractor) sit behind
//! traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically, including injected failures
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod extractor;
pub mod store;

pub use clock::NullClock;
pub use extractor::NullExtractor;
pub use store::NullStore;
