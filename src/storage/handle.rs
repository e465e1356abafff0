//! Owned handle over the on-disk key-value store
//!
//! The handle is the only way to reach the store. It is opened once per
//! session, passed by reference to every operation, and released either by
//! `close` (which reports flush failures) or by drop on any other exit path.
//!
//! Opening never creates a store: a missing directory or a directory without a
//! store manifest fails with `TM_STORE_OPEN_FAILED` before the engine touches
//! the path.
//!
//! Two modes:
//! - `open` takes the store lock and may delete. The engine rewrites the
//!   manifest and flushes recovered logs in its own table format, so a store
//!   written by a LevelDB producer is no longer readable by LevelDB afterwards.
//! - `open_read_only` leaves the manifest, logs and tables untouched and takes
//!   no lock. Only the engine's informational `LOG` file is rotated. Use it for
//!   every operation that cannot repair.

use std::path::{Path, PathBuf};

use rocksdb::{DBIteratorWithThreadMode, Direction, IteratorMode, Options, DB};
use tracing::debug;

use super::errors::{StorageError, StorageResult};

/// File every initialized store directory carries.
const MANIFEST_POINTER: &str = "CURRENT";

/// Engine tunables applied at open time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Upper bound on table files held open, `-1` for unlimited
    pub max_open_files: i32,
    /// Verify checksums aggressively while opening and reading
    pub paranoid_checks: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            max_open_files: 64,
            paranoid_checks: false,
        }
    }
}

impl StoreOptions {
    fn to_engine_options(&self) -> Options {
        let mut opts = Options::default();
        opts.create_if_missing(false);
        opts.set_max_open_files(self.max_open_files);
        opts.set_paranoid_checks(self.paranoid_checks);
        opts
    }
}

/// Handle on an opened store.
pub struct StoreHandle {
    path: PathBuf,
    db: DB,
    read_only: bool,
}

impl StoreHandle {
    /// Opens an existing store for reading and repair.
    ///
    /// Fails if the path is missing, is not a store, or is locked by another
    /// handle or process.
    pub fn open(path: &Path, options: &StoreOptions) -> StorageResult<Self> {
        Self::check_layout(path)?;

        let db = DB::open(&options.to_engine_options(), path).map_err(|e| {
            StorageError::open_rejected(format!("Failed to open store at {}", path.display()), e)
        })?;

        debug!(path = %path.display(), "store opened");

        Ok(Self {
            path: path.to_path_buf(),
            db,
            read_only: false,
        })
    }

    /// Opens an existing store without touching its data files.
    ///
    /// Deletions through a read-only handle fail with `TM_STORE_DELETE_FAILED`.
    pub fn open_read_only(path: &Path, options: &StoreOptions) -> StorageResult<Self> {
        Self::check_layout(path)?;

        let db = DB::open_for_read_only(&options.to_engine_options(), path, false)
            .map_err(|e| {
                StorageError::open_rejected(
                    format!("Failed to open store read-only at {}", path.display()),
                    e,
                )
            })?;

        debug!(path = %path.display(), "store opened read-only");

        Ok(Self {
            path: path.to_path_buf(),
            db,
            read_only: true,
        })
    }

    fn check_layout(path: &Path) -> StorageResult<()> {
        if !path.is_dir() {
            return Err(StorageError::open_failed(format!(
                "Store path does not exist or is not a directory: {}",
                path.display()
            )));
        }

        if !path.join(MANIFEST_POINTER).is_file() {
            return Err(StorageError::open_failed(format!(
                "Directory is not a key-value store (no {} file): {}",
                MANIFEST_POINTER,
                path.display()
            )));
        }

        Ok(())
    }

    /// Whether this handle was opened with `open_read_only`.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Point lookup. `Ok(None)` when the key does not exist.
    pub fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        self.db
            .get(key)
            .map_err(|e| StorageError::read_failed(key, e))
    }

    /// Forward iterator over every entry whose key starts with `prefix`.
    pub fn prefix_iter<'a>(&'a self, prefix: &'a [u8]) -> PrefixIter<'a> {
        PrefixIter {
            prefix,
            inner: self
                .db
                .iterator(IteratorMode::From(prefix, Direction::Forward)),
            done: false,
        }
    }

    /// Removes a single key.
    pub fn delete(&self, key: &[u8]) -> StorageResult<()> {
        self.db
            .delete(key)
            .map_err(|e| StorageError::deletion_failed(key, e))
    }

    /// Syncs pending deletions and releases the store lock.
    pub fn close(self) -> StorageResult<()> {
        if !self.read_only {
            self.db.flush_wal(true).map_err(|e| {
                StorageError::close_failed(
                    format!("Failed to sync store at {}", self.path.display()),
                    e,
                )
            })?;
        }

        debug!(path = %self.path.display(), "store closed");
        Ok(())
    }
}

/// Iterator bounded to one key prefix.
///
/// Yields raw `(key, value)` pairs in key order and stops at the first key
/// outside the prefix or after the first engine error.
pub struct PrefixIter<'a> {
    prefix: &'a [u8],
    inner: DBIteratorWithThreadMode<'a, DB>,
    done: bool,
}

impl Iterator for PrefixIter<'_> {
    type Item = StorageResult<(Box<[u8]>, Box<[u8]>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.inner.next()? {
            Ok((key, value)) => {
                if key.starts_with(self.prefix) {
                    Some(Ok((key, value)))
                } else {
                    self.done = true;
                    None
                }
            }
            Err(e) => {
                self.done = true;
                Some(Err(StorageError::scan_failed(self.prefix, e)))
            }
        }
    }
}
