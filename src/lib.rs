//! tokenmap-inspect - inspect and self-repair a cross-chain token map
//!
//! The token map lives in a sorted key-value store written by an external
//! producer. This crate reads it, groups it, and deletes entries that fail
//! structural validation.

pub mod cli;
pub mod observability;
pub mod query;
pub mod storage;
