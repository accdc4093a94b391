//! Trending-Books: a trending-list book scraper
//!
//! This crate fetches the paginated "trending" listing of a book catalogue,
//! extracts per-book metadata from every listing item and stores each book
//! as a document with a monotonically increasing identifier.

pub mod config;
pub mod crawler;
pub mod record;
pub mod storage;

use thiserror::Error;

/// Main error type for Trending-Books operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage connection error: {0}")]
    Connection(#[source] storage::StorageError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Extraction error: {0}")]
    Extract(#[from] crawler::ExtractError),

    #[error("Write error for book {id}: {source}")]
    Write {
        id: i64,
        source: storage::StorageError,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid database URI: {0}")]
    InvalidDatabaseUri(String),
}

/// Result type alias for Trending-Books operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

// Re-export commonly used types
pub use config::{Config, FailurePolicy};
pub use crawler::{connect_scraper, RunSummary, Scraper};
pub use record::BookRecord;
