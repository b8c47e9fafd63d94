//! In-process sink
//!
//! Keeps records in a vector. Useful for library callers that want the
//! persistence step in the timed path without a database file.

use crate::crawler::ParsedRecord;
use crate::storage::traits::{RecordSink, SinkError, SinkResult};
use crate::strategy::StrategyKind;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(StrategyKind, ParsedRecord)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything stored so far, in write order
    pub fn records(&self) -> Vec<(StrategyKind, ParsedRecord)> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl RecordSink for MemorySink {
    fn write(&self, record: &ParsedRecord, strategy: StrategyKind) -> SinkResult<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| SinkError::Lock(e.to_string()))?;
        records.push((strategy, record.clone()));
        Ok(())
    }

    fn clear(&self) -> SinkResult<()> {
        self.records
            .lock()
            .map_err(|e| SinkError::Lock(e.to_string()))?
            .clear();
        Ok(())
    }

    fn count(&self) -> SinkResult<u64> {
        let records = self
            .records
            .lock()
            .map_err(|e| SinkError::Lock(e.to_string()))?;
        Ok(records.len() as u64)
    }

    fn count_by_strategy(&self) -> SinkResult<Vec<(String, u64)>> {
        let records = self
            .records
            .lock()
            .map_err(|e| SinkError::Lock(e.to_string()))?;

        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for (strategy, _) in records.iter() {
            *counts.entry(strategy.as_str().to_string()).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }
}
