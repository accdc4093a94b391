//! Storage module for persisting scraped books
//!
//! This module handles all database operations, including:
//! - Parsing connection URIs and opening the document store
//! - Allocating the next book identifier
//! - Writing book documents under a deadline

mod schema;
mod sqlite;
mod traits;
mod uri;

pub use sqlite::SqliteStorage;
pub use traits::{BookStore, StorageError, StorageResult};
pub use uri::DatabaseUri;

use crate::record::BookRecord;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared, async-facing handle to a book store
///
/// Every call runs the blocking store operation on tokio's blocking pool and
/// gives up after the handle's operation deadline. A timed-out operation is
/// not cancelled; it finishes in the background and its result is dropped.
pub struct StoreHandle<S> {
    inner: Arc<Mutex<S>>,
    operation_timeout: Duration,
}

impl<S> Clone for StoreHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            operation_timeout: self.operation_timeout,
        }
    }
}

impl<S: BookStore + Send + 'static> StoreHandle<S> {
    pub fn new(store: S, operation_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
            operation_timeout,
        }
    }

    /// Returns the next free identifier (current maximum + 1, starting at 1)
    pub async fn next_id(&self) -> StorageResult<i64> {
        self.run("id lookup", |store| store.next_id()).await
    }

    /// Inserts one book
    pub async fn write(&self, book: BookRecord) -> StorageResult<()> {
        self.run("insert", move |store| store.insert_book(&book))
            .await
    }

    pub async fn count_books(&self) -> StorageResult<u64> {
        self.run("count", |store| store.count_books()).await
    }

    async fn run<T, F>(&self, operation: &'static str, f: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut S) -> StorageResult<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let task = tokio::task::spawn_blocking(move || {
            let mut store = inner.lock().map_err(|_| StorageError::Poisoned)?;
            f(&mut *store)
        });

        match tokio::time::timeout(self.operation_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(StorageError::TaskFailed(join_error.to_string())),
            Err(_) => Err(StorageError::Timeout {
                operation,
                after: self.operation_timeout,
            }),
        }
    }
}

/// Opens the document store named by `uri` and verifies it answers
///
/// # Arguments
///
/// * `uri` - Connection URI (see [`DatabaseUri`])
/// * `connect_timeout` - Deadline for opening and pinging the store
/// * `operation_timeout` - Deadline applied to every later handle call
///
/// # Returns
///
/// * `Ok(StoreHandle)` - Connected and verified store
/// * `Err(StorageError)` - Bad URI, open/ping failure or deadline exceeded
pub async fn connect(
    uri: &str,
    connect_timeout: Duration,
    operation_timeout: Duration,
) -> StorageResult<StoreHandle<SqliteStorage>> {
    let uri = DatabaseUri::parse(uri)?;
    tracing::debug!("Connecting to document store at {}", uri);

    let task = tokio::task::spawn_blocking(move || {
        let storage = SqliteStorage::open(&uri)?;
        storage.ping()?;
        Ok::<_, StorageError>(storage)
    });

    let storage = match tokio::time::timeout(connect_timeout, task).await {
        Ok(Ok(result)) => result?,
        Ok(Err(join_error)) => return Err(StorageError::TaskFailed(join_error.to_string())),
        Err(_) => {
            return Err(StorageError::Timeout {
                operation: "connect",
                after: connect_timeout,
            })
        }
    };

    Ok(StoreHandle::new(storage, operation_timeout))
}
