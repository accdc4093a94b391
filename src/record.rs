//! The book record stored for every listing item

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Genre tag attached to every scraped book
pub const DEFAULT_GENRE: &str = "fantasy";

/// One scraped book
///
/// The serialized form is the public document representation; `created_at`
/// is kept out of it and persisted in its own column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub edition_count: i64,
    pub genres: Vec<String>,
    pub version: Uuid,
    #[serde(skip, default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl BookRecord {
    /// Assembles a record from extracted fields, minting a fresh version token
    pub fn new(id: i64, title: String, author: String, year: i32, edition_count: i64) -> Self {
        Self {
            id,
            title,
            author,
            year,
            edition_count,
            genres: vec![DEFAULT_GENRE.to_string()],
            version: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }
}
