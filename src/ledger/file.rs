//! File-backed redemption ledger with atomic writes.
//!
//! Stores redeemed claim keys under `dirs::data_dir()/<namespace>/redemptions.json`.
//! Uses temp file + rename for atomic writes.

use crate::ledger::{RedemptionLedger, RedemptionSet};
use crate::protocol::claim::InvitationClaim;
use crate::ClaimError;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File name used inside a namespace directory.
pub const LEDGER_FILE_NAME: &str = "redemptions.json";

/// Redemption ledger persisted to a JSON file.
///
/// The file is loaded once on open and rewritten on every successful
/// consume. One process should own a given file.
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    set: Mutex<RedemptionSet>,
}

impl FileLedger {
    /// Open (or create) a ledger at the given path.
    pub fn open(path: PathBuf) -> Result<Self, ClaimError> {
        let set = if path.exists() {
            let json = fs::read_to_string(&path)
                .map_err(|e| ClaimError::LedgerIO(format!("Failed to read ledger: {}", e)))?;
            serde_json::from_str(&json)
                .map_err(|e| ClaimError::LedgerIO(format!("Failed to parse ledger: {}", e)))?
        } else {
            RedemptionSet::new()
        };

        Ok(Self {
            path,
            set: Mutex::new(set),
        })
    }

    /// Open a ledger with a namespace under data_dir.
    pub fn with_namespace(namespace: &str) -> Result<Self, ClaimError> {
        let base_dir = dirs::data_dir()
            .ok_or_else(|| ClaimError::LedgerIO("Could not find data directory".to_string()))?;

        let dir = base_dir.join(namespace);
        fs::create_dir_all(&dir)
            .map_err(|e| ClaimError::LedgerIO(format!("Failed to create dir: {}", e)))?;

        Self::open(dir.join(LEDGER_FILE_NAME))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of live entries.
    ///
    /// Reads through a poisoned lock.
    pub fn len(&self) -> usize {
        self.set
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Whether the ledger holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn save(&self, set: &RedemptionSet) -> Result<(), ClaimError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ClaimError::LedgerIO(format!("Failed to create dir: {}", e)))?;
        }

        let json = serde_json::to_string_pretty(set)
            .map_err(|e| ClaimError::LedgerIO(format!("Failed to serialize: {}", e)))?;

        // Atomic write via temp + rename
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &json)
            .map_err(|e| ClaimError::LedgerIO(format!("Failed to write temp: {}", e)))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|e| ClaimError::LedgerIO(format!("Failed to rename: {}", e)))?;

        Ok(())
    }
}

impl RedemptionLedger for FileLedger {
    fn consume(&self, claim: &InvitationClaim, now: DateTime<Utc>) -> Result<(), ClaimError> {
        let mut set = self
            .set
            .lock()
            .map_err(|_| ClaimError::LedgerIO("ledger lock poisoned".to_string()))?;

        // Memory only changes once the write has landed
        let mut staged = set.clone();
        staged.consume(claim, now)?;
        self.save(&staged)?;
        *set = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn claim(salt: &str) -> InvitationClaim {
        InvitationClaim::new(
            "acme",
            "lk_001",
            salt,
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 15, 0).unwrap(),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_file_ledger_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(LEDGER_FILE_NAME);

        let ledger = FileLedger::open(path.clone()).unwrap();
        assert!(ledger.is_empty());
        ledger.consume(&claim("one"), now()).unwrap();
        drop(ledger);

        let reopened = FileLedger::open(path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert!(matches!(
            reopened.consume(&claim("one"), now()),
            Err(ClaimError::ClaimReplayed)
        ));
    }

    #[test]
    fn test_file_ledger_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join(LEDGER_FILE_NAME);

        let ledger = FileLedger::open(path.clone()).unwrap();
        ledger.consume(&claim("one"), now()).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(ledger.path(), path.as_path());
    }

    #[test]
    fn test_file_ledger_prunes_on_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(LEDGER_FILE_NAME);

        let ledger = FileLedger::open(path.clone()).unwrap();
        ledger.consume(&claim("one"), now()).unwrap();

        let later = Utc.with_ymd_and_hms(2025, 1, 1, 0, 15, 0).unwrap() + Duration::seconds(1);
        let fresh = InvitationClaim::new("acme", "lk_001", "two", later + Duration::minutes(15));
        ledger.consume(&fresh, later).unwrap();

        let reopened = FileLedger::open(path).unwrap();
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn test_file_ledger_len_after_poisoned_lock() {
        let temp_dir = TempDir::new().unwrap();
        let ledger = Arc::new(FileLedger::open(temp_dir.path().join(LEDGER_FILE_NAME)).unwrap());
        ledger.consume(&claim("one"), now()).unwrap();

        let holder = Arc::clone(&ledger);
        let _ = thread::spawn(move || {
            let _guard = holder.set.lock().unwrap();
            panic!("redeemer crashed mid-consume");
        })
        .join();

        assert!(ledger.set.is_poisoned());
        assert_eq!(ledger.len(), 1);
        assert!(!ledger.is_empty());
    }

    #[test]
    fn test_file_ledger_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(LEDGER_FILE_NAME);
        fs::write(&path, "not json").unwrap();

        let result = FileLedger::open(path);
        assert!(matches!(result, Err(ClaimError::LedgerIO(_))));
    }
}
