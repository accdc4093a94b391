//! Storage traits and error types
//!
//! This module defines the trait interface for book stores and the
//! associated error types.

use crate::record::BookRecord;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid database URI: {0}")]
    InvalidUri(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt document {id}: {message}")]
    Corrupt { id: i64, message: String },

    #[error("A book with id {0} already exists")]
    DuplicateId(i64),

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Storage lock poisoned")]
    Poisoned,

    #[error("Storage task failed: {0}")]
    TaskFailed(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document store backends
///
/// Calls are blocking; async callers go through
/// [`StoreHandle`](crate::storage::StoreHandle), which moves them onto the
/// blocking pool and applies deadlines.
pub trait BookStore {
    /// Verifies the connection is usable
    fn ping(&self) -> StorageResult<()>;

    /// Returns the highest stored id, or `None` for an empty collection
    fn max_id(&self) -> StorageResult<Option<i64>>;

    /// Inserts one book
    ///
    /// Fails with [`StorageError::DuplicateId`] if the id is taken.
    fn insert_book(&mut self, book: &BookRecord) -> StorageResult<()>;

    /// Counts stored books
    fn count_books(&self) -> StorageResult<u64>;

    /// Allocates the next identifier: the current maximum plus one
    ///
    /// An empty collection starts at 1. Nothing reserves the returned id, so
    /// callers must not allocate for two books before writing the first.
    fn next_id(&self) -> StorageResult<i64> {
        Ok(self.max_id()?.unwrap_or(0) + 1)
    }
}
