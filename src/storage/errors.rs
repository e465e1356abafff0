//! Store error types
//!
//! Error codes:
//! - TM_STORE_OPEN_FAILED (FATAL severity)
//! - TM_STORE_CLOSE_FAILED (ERROR severity)
//! - TM_STORE_READ_FAILED (ERROR severity)
//! - TM_STORE_DELETE_FAILED (ERROR severity)
//!
//! Per-record decode failures are not storage errors; see `record::RecordError`.

use std::fmt;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, the handle stays usable
    Error,
    /// No operation is possible
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Store missing, inaccessible, or locked by another process
    OpenFailed,
    /// Flush or lock release failed on close
    CloseFailed,
    /// Point read or iteration failed
    ReadFailed,
    /// Removing an invalid record failed
    DeletionFailed,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::OpenFailed => "TM_STORE_OPEN_FAILED",
            StorageErrorCode::CloseFailed => "TM_STORE_CLOSE_FAILED",
            StorageErrorCode::ReadFailed => "TM_STORE_READ_FAILED",
            StorageErrorCode::DeletionFailed => "TM_STORE_DELETE_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StorageErrorCode::OpenFailed => Severity::Fatal,
            StorageErrorCode::CloseFailed => Severity::Error,
            StorageErrorCode::ReadFailed => Severity::Error,
            StorageErrorCode::DeletionFailed => Severity::Error,
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with code, message and optional key context
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    /// Key the failure concerns, if any
    details: Option<String>,
    source: Option<rocksdb::Error>,
}

impl StorageError {
    fn new(code: StorageErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    fn with_source(mut self, source: rocksdb::Error) -> Self {
        self.source = Some(source);
        self
    }

    fn with_key(mut self, key: &[u8]) -> Self {
        self.details = Some(format!("key: {}", String::from_utf8_lossy(key)));
        self
    }

    /// Store could not be opened, no store engine error involved
    pub fn open_failed(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::OpenFailed, message)
    }

    /// Store engine refused to open the path
    pub fn open_rejected(message: impl Into<String>, source: rocksdb::Error) -> Self {
        Self::new(StorageErrorCode::OpenFailed, message).with_source(source)
    }

    /// Close failed
    pub fn close_failed(message: impl Into<String>, source: rocksdb::Error) -> Self {
        Self::new(StorageErrorCode::CloseFailed, message).with_source(source)
    }

    /// Read of a single key failed
    pub fn read_failed(key: &[u8], source: rocksdb::Error) -> Self {
        Self::new(StorageErrorCode::ReadFailed, "Failed to read key")
            .with_key(key)
            .with_source(source)
    }

    /// Iteration over a key range failed
    pub fn scan_failed(prefix: &[u8], source: rocksdb::Error) -> Self {
        Self::new(StorageErrorCode::ReadFailed, "Failed to iterate prefix")
            .with_key(prefix)
            .with_source(source)
    }

    /// Deleting a key failed
    pub fn deletion_failed(key: &[u8], source: rocksdb::Error) -> Self {
        Self::new(StorageErrorCode::DeletionFailed, "Failed to delete key")
            .with_key(key)
            .with_source(source)
    }

    /// Records how far a repair got before this error stopped it
    pub fn after_deletions(mut self, deleted_before: usize) -> Self {
        self.message = format!(
            "Failed to delete invalid record after {} successful deletions",
            deleted_before
        );
        self
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
