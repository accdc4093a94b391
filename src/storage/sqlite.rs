//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the BookStore trait.

use crate::record::BookRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{BookStore, StorageError, StorageResult};
use crate::storage::uri::DatabaseUri;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database named by a connection URI
    pub fn open(uri: &DatabaseUri) -> StorageResult<Self> {
        match uri {
            DatabaseUri::File(path) => Self::new(path),
            DatabaseUri::Memory => Self::new_in_memory(),
        }
    }

    /// Creates a new SqliteStorage instance backed by a file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Gets every stored book in id order
    pub fn list_books(&self) -> StorageResult<Vec<BookRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, document, created_at FROM books ORDER BY id ASC")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.iter()
            .map(|(id, document, created_at)| book_from_row(*id, document, created_at))
            .collect()
    }
}

/// Rebuilds a record from its stored document and insertion timestamp
fn book_from_row(id: i64, document: &str, created_at: &str) -> StorageResult<BookRecord> {
    let mut book: BookRecord = serde_json::from_str(document)?;
    book.created_at = DateTime::parse_from_rfc3339(created_at)
        .map_err(|e| StorageError::Corrupt {
            id,
            message: format!("bad created_at '{}': {}", created_at, e),
        })?
        .with_timezone(&Utc);
    Ok(book)
}

impl BookStore for SqliteStorage {
    fn ping(&self) -> StorageResult<()> {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    fn max_id(&self) -> StorageResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM books ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn insert_book(&mut self, book: &BookRecord) -> StorageResult<()> {
        let document = serde_json::to_string(book)?;

        let result = self.conn.execute(
            "INSERT INTO books (id, document, created_at) VALUES (?1, ?2, ?3)",
            params![book.id, document, book.created_at.to_rfc3339()],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::DuplicateId(book.id))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn count_books(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
