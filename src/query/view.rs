//! Result shapes returned by the query layer

use std::collections::BTreeMap;

use serde::Serialize;

use crate::storage::{RepairedKey, TokenMapItem};

/// Records grouped by root chain type.
///
/// Chains are ordered by name; records inside a chain keep scan (key) order.
/// Only chains with at least one valid record appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMapView {
    pub chains: BTreeMap<String, Vec<TokenMapItem>>,
    /// Entries the scan found invalid
    pub repairs: Vec<RepairedKey>,
}

impl TokenMapView {
    /// Groups `records` by chain, preserving their order within each group.
    pub fn group(records: Vec<TokenMapItem>, repairs: Vec<RepairedKey>) -> Self {
        let mut chains: BTreeMap<String, Vec<TokenMapItem>> = BTreeMap::new();
        for record in records {
            chains
                .entry(record.root_chain_type.clone())
                .or_default()
                .push(record);
        }
        Self { chains, repairs }
    }

    /// Total number of valid records across all chains.
    pub fn total(&self) -> usize {
        self.chains.values().map(Vec::len).sum()
    }

    /// Record count per chain.
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.chains
            .iter()
            .map(|(chain, items)| (chain.clone(), items.len()))
            .collect()
    }

    /// Removes and returns one chain's records, empty when unknown.
    pub fn take_chain(&mut self, chain: &str) -> Vec<TokenMapItem> {
        self.chains.remove(chain).unwrap_or_default()
    }
}

/// A query value together with the repairs its scan performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanned<T> {
    pub value: T,
    pub repairs: Vec<RepairedKey>,
}

/// Producer bookkeeping stored beside the mappings.
///
/// Each field is `None` when its key is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenMapMetadata {
    /// Hash over all mapping data, lowercase hex
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Last event id processed, as stored
    #[serde(rename = "lastEventID", skip_serializing_if = "Option::is_none")]
    pub last_event_id: Option<String>,
    /// Last block checked, as stored
    #[serde(rename = "checkedEndBlock", skip_serializing_if = "Option::is_none")]
    pub checked_end_block: Option<String>,
}

impl TokenMapMetadata {
    pub fn is_empty(&self) -> bool {
        self.hash.is_none() && self.last_event_id.is_none() && self.checked_end_block.is_none()
    }
}
