//! Database connection URIs
//!
//! Accepted forms:
//!
//! - `sqlite://books.db` (relative path)
//! - `sqlite:///var/lib/books.db` (absolute path)
//! - `sqlite::memory:` or `sqlite://:memory:` (private in-memory database)

use crate::storage::traits::StorageError;
use std::fmt;
use std::path::PathBuf;

const SCHEME_PREFIX: &str = "sqlite://";
const MEMORY_URIS: [&str; 2] = ["sqlite::memory:", "sqlite://:memory:"];

/// A parsed document store location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUri {
    /// Database file on disk
    File(PathBuf),
    /// In-memory database that lives as long as the connection
    Memory,
}

impl DatabaseUri {
    pub fn parse(uri: &str) -> Result<Self, StorageError> {
        let uri = uri.trim();

        if MEMORY_URIS.contains(&uri) {
            return Ok(Self::Memory);
        }

        let path = uri
            .strip_prefix(SCHEME_PREFIX)
            .ok_or_else(|| StorageError::InvalidUri(format!("unsupported scheme in '{}'", uri)))?;

        if path.is_empty() {
            return Err(StorageError::InvalidUri(format!(
                "missing database path in '{}'",
                uri
            )));
        }

        Ok(Self::File(PathBuf::from(path)))
    }
}

impl fmt::Display for DatabaseUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}{}", SCHEME_PREFIX, path.display()),
            Self::Memory => f.write_str(MEMORY_URIS[0]),
        }
    }
}
