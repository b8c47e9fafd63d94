//! Document store schema
//!
//! Records live in a single fixed collection. There is no migration logic;
//! the table is created if missing.

/// Name of the collection (table) parsed records are written to
pub const COLLECTION: &str = "webpages";

/// SQL schema for the document store
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS webpages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    fetched_at TEXT NOT NULL,
    strategy TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_webpages_url ON webpages(url);
CREATE INDEX IF NOT EXISTS idx_webpages_strategy ON webpages(strategy);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
