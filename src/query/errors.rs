//! # Query Errors

use thiserror::Error;

use crate::storage::{RecordError, StorageError};

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query errors
///
/// Scans never return `Record`: bad entries found while scanning are repaired
/// and reported in the result instead. Only point lookups surface them.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Stored token map record is invalid: {0}")]
    Record(#[from] RecordError),
}

impl QueryError {
    /// Stable code for the presentation layer
    pub fn code_str(&self) -> &'static str {
        match self {
            QueryError::Storage(e) => e.code().code(),
            QueryError::Record(_) => "TM_RECORD_INVALID",
        }
    }
}
