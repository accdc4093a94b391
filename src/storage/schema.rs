//! Database schema definitions
//!
//! The store holds a single collection. Each row is the JSON document of one
//! book, keyed by its numeric id.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One document per scraped book
CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY,
    document TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
