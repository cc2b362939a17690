//! Shared utilities for the idseal identity ledger.

pub mod stats;
pub mod time;

pub use stats::{Stat, StatsCounter, StatsSnapshot};
pub use time::format_millis;
