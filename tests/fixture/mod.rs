//! Store fixtures for integration tests
//!
//! The library has no write path, so fixtures seed the store by opening it
//! directly with the engine, then close it before the code under test runs.

#![allow(dead_code)]

use std::path::Path;

use rocksdb::{Options, DB};
use tempfile::TempDir;
use tokenmap_inspect::query::TokenMapQuery;
use tokenmap_inspect::storage::{StoreHandle, StoreOptions, TokenMapItem};

/// A store directory with seeded content.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    /// Creates an empty store.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self::write(dir.path(), |_| {});
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Stores a valid record under its own key.
    pub fn put_item(&self, item: &TokenMapItem) -> &Self {
        let value = item.encode().unwrap();
        self.put_raw(&item.key(), &value)
    }

    /// Stores raw bytes under a raw key.
    pub fn put_raw(&self, key: &[u8], value: &[u8]) -> &Self {
        Self::write(self.path(), |db| db.put(key, value).unwrap());
        self
    }

    pub fn open(&self) -> StoreHandle {
        StoreHandle::open(self.path(), &StoreOptions::default()).unwrap()
    }

    pub fn query(&self) -> TokenMapQuery {
        TokenMapQuery::new(self.open())
    }

    fn write(path: &Path, f: impl FnOnce(&DB)) {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path).unwrap();
        f(&db);
    }
}

pub fn item(chain: &str, token: &str, event_id: u64) -> TokenMapItem {
    TokenMapItem::new(chain, token, format!("child-{}", token), event_id)
}

/// The three-entry dataset: two valid ethereum mappings, one polygon
/// mapping with a zero event id.
pub fn mixed_fixture() -> Fixture {
    let fixture = Fixture::new();
    fixture
        .put_item(&item("ethereum", "A1", 5))
        .put_item(&item("ethereum", "A2", 7))
        .put_item(&item("polygon", "B1", 0));
    fixture
}
