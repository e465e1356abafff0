//! Scan-repair engine
//!
//! Walks every entry under a key prefix, decodes it, and splits the range into
//! valid records and condemned keys. A bad entry never stops the walk; it is
//! logged, remembered, and removed once iteration has finished so the store is
//! not mutated under a live iterator.
//!
//! # Deletion policy
//!
//! Strict: the first failed deletion aborts the scan with
//! `TM_STORE_DELETE_FAILED` and the records gathered so far are dropped. Keys
//! removed before the failure stay removed; a rerun picks up the rest.

use tracing::{debug, error, info, warn};

use super::errors::StorageResult;
use super::handle::StoreHandle;
use super::record::{decode, TokenMapItem};

/// What to do with entries that fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepairPolicy {
    /// Delete them from the store
    #[default]
    Delete,
    /// Report them, leave the store untouched
    ReportOnly,
}

/// A key that failed decoding during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairedKey {
    /// Raw key as stored
    pub key: Vec<u8>,
    /// Decode error that condemned it
    pub reason: String,
    /// Whether the key was removed from the store
    pub deleted: bool,
}

impl RepairedKey {
    /// Key rendered for humans.
    pub fn key_lossy(&self) -> String {
        String::from_utf8_lossy(&self.key).into_owned()
    }
}

/// Result of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Valid records in key order
    pub records: Vec<TokenMapItem>,
    /// Entries that failed decoding, in key order
    pub repairs: Vec<RepairedKey>,
}

impl ScanOutcome {
    /// Number of keys actually removed from the store.
    pub fn deleted_count(&self) -> usize {
        self.repairs.iter().filter(|r| r.deleted).count()
    }
}

/// Scans `prefix`, validates every entry, and applies `policy` to the bad ones.
pub fn scan_prefix(
    store: &StoreHandle,
    prefix: &[u8],
    policy: RepairPolicy,
) -> StorageResult<ScanOutcome> {
    let mut outcome = ScanOutcome::default();

    for entry in store.prefix_iter(prefix) {
        let (key, value) = entry?;

        match decode(&key, &value) {
            Ok(item) => outcome.records.push(item),
            Err(e) => {
                warn!(
                    key = %String::from_utf8_lossy(&key),
                    reason = %e,
                    "invalid token map entry"
                );
                outcome.repairs.push(RepairedKey {
                    key: key.into_vec(),
                    reason: e.to_string(),
                    deleted: false,
                });
            }
        }
    }

    if policy == RepairPolicy::Delete {
        delete_condemned(store, &mut outcome.repairs)?;
    }

    debug!(
        prefix = %String::from_utf8_lossy(prefix),
        valid = outcome.records.len(),
        invalid = outcome.repairs.len(),
        deleted = outcome.deleted_count(),
        read_only = store.is_read_only(),
        "prefix scan complete"
    );

    Ok(outcome)
}

fn delete_condemned(store: &StoreHandle, repairs: &mut [RepairedKey]) -> StorageResult<()> {
    for (deleted_before, repair) in repairs.iter_mut().enumerate() {
        if let Err(e) = store.delete(&repair.key) {
            error!(key = %repair.key_lossy(), error = %e, "repair aborted");
            return Err(e.after_deletions(deleted_before));
        }
        repair.deleted = true;
        info!(key = %repair.key_lossy(), reason = %repair.reason, "deleted invalid entry");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{StorageErrorCode, StoreOptions, TOKEN_MAP_PREFIX};
    use rocksdb::{Options, DB};
    use std::path::Path;
    use tempfile::TempDir;

    fn seed(path: &Path, entries: &[(&str, Vec<u8>)]) {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path).unwrap();
        for (k, v) in entries {
            db.put(k, v).unwrap();
        }
    }

    fn valid(chain: &str, token: &str, event_id: u64) -> (String, Vec<u8>) {
        let item = TokenMapItem::new(chain, token, format!("child-{}", token), event_id);
        (
            String::from_utf8(item.key()).unwrap(),
            item.encode().unwrap(),
        )
    }

    fn open(path: &Path) -> StoreHandle {
        StoreHandle::open(path, &StoreOptions::default()).unwrap()
    }

    #[test]
    fn test_empty_range() {
        let temp_dir = TempDir::new().unwrap();
        seed(temp_dir.path(), &[("tm-hash", b"abc".to_vec())]);

        let store = open(temp_dir.path());
        let outcome = scan_prefix(&store, TOKEN_MAP_PREFIX, RepairPolicy::Delete).unwrap();
        assert!(outcome.records.is_empty());
        assert!(outcome.repairs.is_empty());
    }

    #[test]
    fn test_invalid_entry_does_not_hide_the_rest() {
        let temp_dir = TempDir::new().unwrap();
        let (k1, v1) = valid("ethereum", "A1", 5);
        let (k2, v2) = valid("ethereum", "A2", 7);
        seed(
            temp_dir.path(),
            &[
                (k1.as_str(), v1),
                ("tmp-ethereumA15", b"{broken".to_vec()),
                (k2.as_str(), v2),
            ],
        );

        let store = open(temp_dir.path());
        let outcome = scan_prefix(&store, TOKEN_MAP_PREFIX, RepairPolicy::Delete).unwrap();

        let tokens: Vec<&str> = outcome
            .records
            .iter()
            .map(|r| r.root_token.as_str())
            .collect();
        assert_eq!(tokens, vec!["A1", "A2"]);
        assert_eq!(outcome.repairs.len(), 1);
        assert_eq!(outcome.repairs[0].key_lossy(), "tmp-ethereumA15");
        assert!(outcome.repairs[0].deleted);
        assert!(store.get(b"tmp-ethereumA15").unwrap().is_none());
    }

    #[test]
    fn test_report_only_leaves_store_untouched() {
        let temp_dir = TempDir::new().unwrap();
        seed(temp_dir.path(), &[("tmp-polygonB1", b"[]".to_vec())]);

        let store = open(temp_dir.path());
        let outcome = scan_prefix(&store, TOKEN_MAP_PREFIX, RepairPolicy::ReportOnly).unwrap();

        assert_eq!(outcome.repairs.len(), 1);
        assert!(!outcome.repairs[0].deleted);
        assert_eq!(outcome.deleted_count(), 0);
        assert!(store.get(b"tmp-polygonB1").unwrap().is_some());
    }

    #[test]
    fn test_second_scan_deletes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let (k1, v1) = valid("ethereum", "A1", 5);
        seed(
            temp_dir.path(),
            &[(k1.as_str(), v1), ("tmp-polygonB1", b"".to_vec())],
        );

        let store = open(temp_dir.path());
        let first = scan_prefix(&store, TOKEN_MAP_PREFIX, RepairPolicy::Delete).unwrap();
        let second = scan_prefix(&store, TOKEN_MAP_PREFIX, RepairPolicy::Delete).unwrap();

        assert_eq!(first.deleted_count(), 1);
        assert_eq!(second.deleted_count(), 0);
        assert!(second.repairs.is_empty());
        assert_eq!(first.records, second.records);
    }

    #[test]
    fn test_failed_deletion_aborts_scan() {
        let temp_dir = TempDir::new().unwrap();
        let (k1, v1) = valid("ethereum", "A1", 5);
        seed(
            temp_dir.path(),
            &[(k1.as_str(), v1), ("tmp-polygonB1", b"{}".to_vec())],
        );

        let store =
            StoreHandle::open_read_only(temp_dir.path(), &StoreOptions::default()).unwrap();
        let err = scan_prefix(&store, TOKEN_MAP_PREFIX, RepairPolicy::Delete).unwrap_err();

        assert_eq!(err.code(), StorageErrorCode::DeletionFailed);
        let message = err.to_string();
        assert!(message.contains("after 0 successful deletions"));
        assert!(message.contains("tmp-polygonB1"));
        assert!(store.get(b"tmp-polygonB1").unwrap().is_some());
    }

    #[test]
    fn test_repair_reason_names_the_failure() {
        let temp_dir = TempDir::new().unwrap();
        let item = TokenMapItem::new("polygon", "B1", "C1", 0);
        seed(
            temp_dir.path(),
            &[("tmp-polygonB1", item.encode().unwrap())],
        );

        let store = open(temp_dir.path());
        let outcome = scan_prefix(&store, TOKEN_MAP_PREFIX, RepairPolicy::Delete).unwrap();
        assert!(outcome.repairs[0].reason.contains("eventId is zero"));
    }
}
