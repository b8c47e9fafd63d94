//! Storage module for persisting parsed records
//!
//! This module holds the document-store side of the benchmark:
//! - The [`RecordSink`] trait the strategies write through
//! - A SQLite-backed document store with a fixed `webpages` collection
//! - An in-memory sink

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemorySink;
pub use schema::COLLECTION;
pub use sqlite::{parse_db_uri, DbLocation, SqliteSink};
pub use traits::{RecordSink, SinkError, SinkResult};

use crate::config::SinkConfig;
use std::sync::Arc;

/// Opens the sink described by the configuration
///
/// # Returns
///
/// * `Ok(None)` - Persistence is disabled
/// * `Ok(Some(sink))` - Store opened and schema initialized
/// * `Err(SinkError)` - The store could not be opened
pub fn open_sink(config: &SinkConfig) -> SinkResult<Option<Arc<dyn RecordSink>>> {
    if !config.enabled {
        return Ok(None);
    }

    let uri = config
        .db_uri
        .as_deref()
        .ok_or_else(|| SinkError::InvalidUri("sink enabled without db_uri".to_string()))?;

    tracing::info!("Opening document store at {} (collection: {})", uri, COLLECTION);
    let sink: Arc<dyn RecordSink> = Arc::new(SqliteSink::open(uri)?);
    Ok(Some(sink))
}
