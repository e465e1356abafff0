//! Token map query layer
//!
//! Every grouped query runs a fresh scan of the `tmp-` namespace, so results
//! always reflect the store as it is now and every call gets a chance to
//! repair. Point lookups, key listings and metadata never repair and work on a
//! read-only handle.
//!
//! A repairing scan over a read-only handle fails with `TM_STORE_DELETE_FAILED`
//! as soon as it finds an invalid entry. Pair read-only handles with
//! `RepairPolicy::ReportOnly`.

use std::collections::BTreeMap;

use tracing::debug;

use crate::storage::{
    decode, mapping_key, scan_prefix, RepairPolicy, StoreHandle, TokenMapItem,
    CHECKED_END_BLOCK_KEY, LAST_EVENT_ID_KEY, TOKEN_MAP_HASH_KEY, TOKEN_MAP_PREFIX,
};

use super::errors::QueryResult;
use super::view::{Scanned, TokenMapMetadata, TokenMapView};

/// Read-only query surface over an opened store.
///
/// Scanning methods take `&mut self` so scans that delete cannot overlap on one
/// handle.
pub struct TokenMapQuery {
    store: StoreHandle,
    policy: RepairPolicy,
}

impl TokenMapQuery {
    /// Wraps an opened store, repairing invalid entries on scan.
    pub fn new(store: StoreHandle) -> Self {
        Self::with_policy(store, RepairPolicy::Delete)
    }

    pub fn with_policy(store: StoreHandle, policy: RepairPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// All valid records grouped by root chain type.
    pub fn list_all(&mut self) -> QueryResult<TokenMapView> {
        let outcome = scan_prefix(&self.store, TOKEN_MAP_PREFIX, self.policy)?;
        Ok(TokenMapView::group(outcome.records, outcome.repairs))
    }

    /// Records of one chain, empty when the chain is unknown.
    pub fn list_by_chain(
        &mut self,
        root_chain_type: &str,
    ) -> QueryResult<Scanned<Vec<TokenMapItem>>> {
        let mut view = self.list_all()?;
        Ok(Scanned {
            value: view.take_chain(root_chain_type),
            repairs: view.repairs,
        })
    }

    /// Exact lookup by chain type and root token.
    ///
    /// Returns `Ok(None)` for a missing key. A stored value that fails decoding
    /// is an error here and is left in place.
    pub fn get_one(
        &self,
        root_chain_type: &str,
        root_token: &str,
    ) -> QueryResult<Option<TokenMapItem>> {
        let key = mapping_key(root_chain_type, root_token);
        match self.store.get(&key)? {
            Some(value) => Ok(Some(decode(&key, &value)?)),
            None => {
                debug!(
                    chain = root_chain_type,
                    token = root_token,
                    "token map entry not found"
                );
                Ok(None)
            }
        }
    }

    /// Every key in the mapping namespace, undecoded.
    pub fn list_keys(&self) -> QueryResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in self.store.prefix_iter(TOKEN_MAP_PREFIX) {
            let (key, _) = entry?;
            keys.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(keys)
    }

    /// Producer bookkeeping. Absent keys become `None`.
    pub fn metadata(&self) -> QueryResult<TokenMapMetadata> {
        let hash = self.store.get(TOKEN_MAP_HASH_KEY)?.map(hex::encode);
        let last_event_id = self
            .store
            .get(LAST_EVENT_ID_KEY)?
            .map(|v| String::from_utf8_lossy(&v).into_owned());
        let checked_end_block = self
            .store
            .get(CHECKED_END_BLOCK_KEY)?
            .map(|v| String::from_utf8_lossy(&v).into_owned());

        Ok(TokenMapMetadata {
            hash,
            last_event_id,
            checked_end_block,
        })
    }

    /// Valid record count per chain.
    pub fn count_by_chain(&mut self) -> QueryResult<Scanned<BTreeMap<String, usize>>> {
        let view = self.list_all()?;
        Ok(Scanned {
            value: view.counts(),
            repairs: view.repairs,
        })
    }

    /// Releases the store.
    pub fn close(self) -> QueryResult<()> {
        self.store.close()?;
        Ok(())
    }
}
