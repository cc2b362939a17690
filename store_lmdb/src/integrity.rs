//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the node serves any
//! registration or verification. Block seals are not rechecked here; that is
//! the ledger crate's chain walk.

use std::path::Path;

use heed::types::Bytes;

use crate::environment::{LmdbEnvironment, DATABASES, SCHEMA_VERSION};
use crate::LmdbError;

/// Summary of an integrity check run.
#[derive(Debug, Default)]
pub struct IntegrityReport {
    /// Entry count per named database that exists.
    pub entries: Vec<(&'static str, u64)>,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn databases_checked(&self) -> usize {
        self.entries.len()
    }

    pub fn total_entries(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn count(&self, db_name: &str) -> Option<u64> {
        self.entries.iter().find(|(n, _)| *n == db_name).map(|(_, c)| *c)
    }
}

/// Startup check of the ledger databases.
///
/// Counts every named database, then checks that each block has exactly one
/// index entry and that the schema version is one this build understands.
/// Read failures are recorded in the report rather than returned as errors.
pub fn check_integrity(env: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport::default();
    let rtxn = env.env().read_txn()?;

    for &db_name in DATABASES {
        match env.env().open_database::<Bytes, Bytes>(&rtxn, Some(db_name)) {
            Ok(Some(db)) => match db.len(&rtxn) {
                Ok(count) => report.entries.push((db_name, count)),
                Err(e) => report
                    .errors
                    .push(format!("failed to read database '{db_name}': {e}")),
            },
            Ok(None) => report.errors.push(format!("database '{db_name}' is missing")),
            Err(e) => report
                .errors
                .push(format!("failed to open database '{db_name}': {e}")),
        }
    }

    if let (Some(blocks), Some(indexed)) = (report.count("blocks"), report.count("block_index")) {
        if blocks != indexed {
            report.errors.push(format!(
                "{blocks} blocks stored but {indexed} index entries"
            ));
        }
    }

    drop(rtxn);
    match env.schema_version() {
        Ok(SCHEMA_VERSION) => {}
        Ok(other) => report.errors.push(format!(
            "schema version {other} is not supported (expected {SCHEMA_VERSION})"
        )),
        Err(e) => report.errors.push(format!("failed to read schema version: {e}")),
    }

    if !report.is_healthy() {
        tracing::warn!(errors = ?report.errors, "ledger integrity check failed");
    }
    Ok(report)
}

/// Check that an existing, non-empty data directory holds an LMDB data file.
///
/// A missing or empty directory is a fresh start and passes.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let mut entries = std::fs::read_dir(path).map_err(|e| format!("{}: {e}", path.display()))?;
    if entries.next().is_none() {
        return Ok(());
    }
    if !path.join("data.mdb").exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;

    #[test]
    fn fresh_path_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_data_dir(&dir.path().join("not-created-yet")).is_ok());
    }

    #[test]
    fn empty_directory_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_data_dir(dir.path()).is_ok());
    }

    #[test]
    fn directory_without_data_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"not a ledger").unwrap();
        assert!(check_data_dir(dir.path()).is_err());
    }

    #[test]
    fn opened_environment_reports_every_database() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 8, 10 * 1024 * 1024).unwrap();
        assert!(check_data_dir(dir.path()).is_ok());

        let report = check_integrity(&env).unwrap();
        assert!(report.is_healthy(), "{:?}", report.errors);
        assert_eq!(report.databases_checked(), DATABASES.len());
        // schema version row in `meta`
        assert_eq!(report.total_entries(), 1);
        assert_eq!(report.count("blocks"), Some(0));
    }

    #[test]
    fn orphan_index_entry_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 8, 10 * 1024 * 1024).unwrap();
        let mut wtxn = env.env().write_txn().unwrap();
        env.block_index_db
            .put(&mut wtxn, &0u64.to_be_bytes(), &[0xab; 32])
            .unwrap();
        wtxn.commit().unwrap();

        let report = check_integrity(&env).unwrap();
        assert!(!report.is_healthy());
        assert!(report.errors[0].contains("index entries"));
    }
}
