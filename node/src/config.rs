//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use idseal_types::{LedgerParams, DEFAULT_TEMPLATE_LEN};

use crate::{LogFormat, NodeError};

/// Where biometric templates come from.
///
/// `Stub` is only ever chosen here; a failing live extractor never falls back
/// to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiometricMode {
    #[default]
    Live,
    Stub,
}

impl fmt::Display for BiometricMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::Stub => f.write_str("stub"),
        }
    }
}

/// Configuration for an idseal node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Required leading zero hex characters per block hash.
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,

    /// Minimum name-similarity score (0-100).
    #[serde(default = "default_name_match_threshold")]
    pub name_match_threshold: u8,

    /// Faces match when their Euclidean distance is below this.
    #[serde(default = "default_biometric_tolerance")]
    pub biometric_tolerance: f64,

    /// Dimensions of every biometric template.
    #[serde(default = "default_template_len")]
    pub template_len: usize,

    #[serde(default)]
    pub biometric_mode: BiometricMode,

    /// Registrations allowed to mine at the same time.
    #[serde(default = "default_mining_workers")]
    pub mining_workers: usize,

    /// Deadline for one registration's proof-of-work, in milliseconds.
    #[serde(default = "default_mining_deadline_ms")]
    pub mining_deadline_ms: u64,

    /// LMDB map size in bytes.
    #[serde(default = "default_lmdb_map_size")]
    pub lmdb_map_size: usize,

    #[serde(default = "default_lmdb_max_dbs")]
    pub lmdb_max_dbs: u32,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./idseal_data")
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_difficulty() -> u8 {
    2
}

fn default_name_match_threshold() -> u8 {
    80
}

fn default_biometric_tolerance() -> f64 {
    0.6
}

fn default_template_len() -> usize {
    DEFAULT_TEMPLATE_LEN
}

fn default_mining_workers() -> usize {
    1
}

fn default_mining_deadline_ms() -> u64 {
    30_000
}

fn default_lmdb_map_size() -> usize {
    1024 * 1024 * 1024
}

fn default_lmdb_max_dbs() -> u32 {
    8
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(format!("{path}: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Reject values no node can run with.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.difficulty > 64 {
            return Err(NodeError::Config(format!(
                "difficulty {} exceeds 64",
                self.difficulty
            )));
        }
        if self.name_match_threshold > 100 {
            return Err(NodeError::Config(format!(
                "name_match_threshold {} exceeds 100",
                self.name_match_threshold
            )));
        }
        if !self.biometric_tolerance.is_finite() || self.biometric_tolerance <= 0.0 {
            return Err(NodeError::Config(format!(
                "biometric_tolerance must be a positive number, got {}",
                self.biometric_tolerance
            )));
        }
        if self.template_len == 0 {
            return Err(NodeError::Config("template_len must be at least 1".into()));
        }
        if self.mining_workers == 0 {
            return Err(NodeError::Config("mining_workers must be at least 1".into()));
        }
        if self.mining_deadline_ms == 0 {
            return Err(NodeError::Config("mining_deadline_ms must be positive".into()));
        }
        self.parsed_log_format()?;
        Ok(())
    }

    pub fn parsed_log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }

    pub fn mining_deadline(&self) -> Duration {
        Duration::from_millis(self.mining_deadline_ms)
    }

    /// The ledger-facing subset of this configuration.
    pub fn ledger_params(&self) -> LedgerParams {
        LedgerParams {
            difficulty: self.difficulty,
            name_match_threshold: self.name_match_threshold,
            biometric_tolerance: self.biometric_tolerance,
            template_len: self.template_len,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            difficulty: default_difficulty(),
            name_match_threshold: default_name_match_threshold(),
            biometric_tolerance: default_biometric_tolerance(),
            template_len: default_template_len(),
            biometric_mode: BiometricMode::default(),
            mining_workers: default_mining_workers(),
            mining_deadline_ms: default_mining_deadline_ms(),
            lmdb_map_size: default_lmdb_map_size(),
            lmdb_max_dbs: default_lmdb_max_dbs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string().expect("serializable");
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.difficulty, config.difficulty);
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.biometric_mode, BiometricMode::Live);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.difficulty, 2);
        assert_eq!(config.name_match_threshold, 80);
        assert_eq!(config.biometric_tolerance, 0.6);
        assert_eq!(config.template_len, 128);
        assert_eq!(config.mining_workers, 1);
        assert_eq!(config.mining_deadline_ms, 30_000);
        assert_eq!(config.lmdb_map_size, 1 << 30);
        assert_eq!(config.lmdb_max_dbs, 8);
        assert_eq!(config.log_format, "human");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            difficulty = 3
            biometric_mode = "stub"
            data_dir = "/var/lib/idseal"
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.difficulty, 3);
        assert_eq!(config.biometric_mode, BiometricMode::Stub);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/idseal"));
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn unknown_biometric_mode_is_rejected() {
        let err = NodeConfig::from_toml_str(r#"biometric_mode = "mock""#).unwrap_err();
        assert!(matches!(err, NodeError::Config(_)));
    }

    #[test]
    fn ledger_params_follow_config() {
        let config = NodeConfig {
            difficulty: 0,
            template_len: 4,
            ..NodeConfig::default()
        };
        let params = config.ledger_params();
        assert_eq!(params.difficulty, 0);
        assert_eq!(params.template_len, 4);
        assert_eq!(params.name_match_threshold, 80);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad = [
            NodeConfig { difficulty: 65, ..NodeConfig::default() },
            NodeConfig { name_match_threshold: 101, ..NodeConfig::default() },
            NodeConfig { biometric_tolerance: f64::NAN, ..NodeConfig::default() },
            NodeConfig { mining_workers: 0, ..NodeConfig::default() },
            NodeConfig { mining_deadline_ms: 0, ..NodeConfig::default() },
            NodeConfig { log_format: "xml".into(), ..NodeConfig::default() },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?} should be invalid");
        }
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/idseal.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}
