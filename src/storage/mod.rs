//! Storage subsystem
//!
//! Owns the key-value store handle, the token map record codec, and the
//! scan-repair engine that walks the mapping namespace.
//!
//! # Layout of the store
//!
//! | Key                     | Value                         |
//! |-------------------------|-------------------------------|
//! | `tmp-<chain><token>`    | JSON token map record         |
//! | `tm-hash`               | raw hash bytes                |
//! | `tm-last-event-id`      | decimal text                  |
//! | `tm-checked-end-block`  | decimal text                  |
//!
//! Only the `tmp-` namespace is ever scanned or repaired.

mod errors;
mod handle;
mod record;
mod scan;

pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use handle::{PrefixIter, StoreHandle, StoreOptions};
pub use record::{decode, mapping_key, RecordError, TokenMapItem, TOKEN_MAP_PREFIX};
pub use scan::{scan_prefix, RepairPolicy, RepairedKey, ScanOutcome};

/// Hash over all mapping data, raw bytes.
pub const TOKEN_MAP_HASH_KEY: &[u8] = b"tm-hash";
/// Last event id the producer processed, decimal text.
pub const LAST_EVENT_ID_KEY: &[u8] = b"tm-last-event-id";
/// Last block the producer checked, decimal text.
pub const CHECKED_END_BLOCK_KEY: &[u8] = b"tm-checked-end-block";
