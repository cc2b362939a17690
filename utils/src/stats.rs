//! Operation counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counted node events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stat {
    Registered,
    RegistrationFailed,
    MiningTimeout,
    Verified,
    Rejected,
    VerdictError,
    VerificationFailed,
}

impl Stat {
    pub const ALL: [Stat; 7] = [
        Stat::Registered,
        Stat::RegistrationFailed,
        Stat::MiningTimeout,
        Stat::Verified,
        Stat::Rejected,
        Stat::VerdictError,
        Stat::VerificationFailed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stat::Registered => "registered",
            Stat::RegistrationFailed => "registration_failed",
            Stat::MiningTimeout => "mining_timeout",
            Stat::Verified => "verified",
            Stat::Rejected => "rejected",
            Stat::VerdictError => "verdict_error",
            Stat::VerificationFailed => "verification_failed",
        }
    }
}

/// A thread-safe set of counters, one per [`Stat`].
#[derive(Debug, Default)]
pub struct StatsCounter {
    counters: [AtomicU64; Stat::ALL.len()],
}

impl StatsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self, stat: Stat) {
        self.add(stat, 1);
    }

    pub fn add(&self, stat: Stat, value: u64) {
        self.counters[stat as usize].fetch_add(value, Ordering::Relaxed);
    }

    pub fn get(&self, stat: Stat) -> u64 {
        self.counters[stat as usize].load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            counts: Stat::ALL.iter().map(|s| (s.name(), self.get(*s))).collect(),
        }
    }
}

/// Point-in-time copy of every counter, in [`Stat::ALL`] order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub counts: Vec<(&'static str, u64)>,
}

impl StatsSnapshot {
    pub fn get(&self, name: &str) -> u64 {
        self.counts
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_independent() {
        let stats = StatsCounter::new();
        stats.increment(Stat::Verified);
        stats.increment(Stat::Verified);
        stats.add(Stat::Rejected, 5);
        assert_eq!(stats.get(Stat::Verified), 2);
        assert_eq!(stats.get(Stat::Rejected), 5);
        assert_eq!(stats.get(Stat::Registered), 0);
    }

    #[test]
    fn snapshot_lists_every_stat() {
        let stats = StatsCounter::new();
        stats.increment(Stat::MiningTimeout);
        let snap = stats.snapshot();
        assert_eq!(snap.counts.len(), Stat::ALL.len());
        assert_eq!(snap.get("mining_timeout"), 1);
        assert_eq!(snap.get("unknown"), 0);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"mining_timeout\",1"));
    }

    #[test]
    fn stat_discriminants_index_all() {
        for (i, stat) in Stat::ALL.iter().enumerate() {
            assert_eq!(*stat as usize, i);
        }
    }
}
