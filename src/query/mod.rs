//! Query layer over the token map
//!
//! Provides:
//! - grouped listing of all mappings and per-chain listing
//! - exact lookup by chain type and root token
//! - raw key enumeration
//! - producer metadata
//! - per-chain counts

mod errors;
mod tokenmap;
mod view;

pub use errors::{QueryError, QueryResult};
pub use tokenmap::TokenMapQuery;
pub use view::{Scanned, TokenMapMetadata, TokenMapView};
