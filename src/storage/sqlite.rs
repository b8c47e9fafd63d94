//! SQLite document store
//!
//! This module provides a SQLite-backed implementation of [`RecordSink`].

use crate::crawler::ParsedRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecordSink, SinkError, SinkResult};
use crate::strategy::StrategyKind;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Where a `db-uri` points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    Memory,
    File(PathBuf),
}

/// Interprets a `db-uri`: a plain path, `sqlite://<path>`, or `:memory:`
pub fn parse_db_uri(uri: &str) -> SinkResult<DbLocation> {
    let uri = uri.trim();
    let rest = uri.strip_prefix("sqlite://").unwrap_or(uri);

    match rest {
        "" => Err(SinkError::InvalidUri(format!("'{}' names no database", uri))),
        ":memory:" => Ok(DbLocation::Memory),
        path => Ok(DbLocation::File(PathBuf::from(path))),
    }
}

/// SQLite sink backend
///
/// The connection sits behind a mutex so pool workers can share the sink.
pub struct SqliteSink {
    conn: Mutex<Connection>,
}

impl SqliteSink {
    /// Opens the store named by a `db-uri`
    pub fn open(uri: &str) -> SinkResult<Self> {
        match parse_db_uri(uri)? {
            DbLocation::Memory => Self::new_in_memory(),
            DbLocation::File(path) => Self::new(&path),
        }
    }

    /// Opens or creates a file-backed store, creating parent directories
    pub fn new(path: &Path) -> SinkResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory store
    pub fn new_in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Loads stored records for one strategy, oldest first
    pub fn records_for(&self, strategy: StrategyKind) -> SinkResult<Vec<ParsedRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT url, title, content, fetched_at FROM webpages WHERE strategy = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![strategy.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (url, title, text, fetched_at) = row?;
            let fetched_at = fetched_at
                .parse::<DateTime<Utc>>()
                .map_err(|e| SinkError::Write(format!("bad timestamp for {}: {}", url, e)))?;
            records.push(ParsedRecord {
                url,
                title,
                text,
                fetched_at,
            });
        }

        Ok(records)
    }

    fn lock(&self) -> SinkResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| SinkError::Lock(e.to_string()))
    }
}

impl RecordSink for SqliteSink {
    fn write(&self, record: &ParsedRecord, strategy: StrategyKind) -> SinkResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO webpages (url, title, content, fetched_at, strategy) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.url,
                record.title,
                record.text,
                record.fetched_at.to_rfc3339(),
                strategy.as_str()
            ],
        )?;
        Ok(())
    }

    fn clear(&self) -> SinkResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM webpages", [])?;
        Ok(())
    }

    fn count(&self) -> SinkResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM webpages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_by_strategy(&self) -> SinkResult<Vec<(String, u64)>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT strategy, COUNT(*) FROM webpages GROUP BY strategy ORDER BY strategy",
        )?;

        let counts = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(counts)
    }
}
