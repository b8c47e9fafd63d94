//! Statistics from the document store
//!
//! Backs `--stats`: how many records each strategy left in the sink.

use crate::storage::{RecordSink, SinkResult, COLLECTION};

/// Record counts in the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkStatistics {
    pub total_records: u64,
    pub records_by_strategy: Vec<(String, u64)>,
}

/// Loads statistics from a sink
pub fn load_statistics(sink: &dyn RecordSink) -> SinkResult<SinkStatistics> {
    Ok(SinkStatistics {
        total_records: sink.count()?,
        records_by_strategy: sink.count_by_strategy()?,
    })
}

/// Formats statistics for the terminal
pub fn format_statistics(stats: &SinkStatistics) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Document Store ({}) ===\n\n", COLLECTION));
    out.push_str(&format!("Total records: {}\n", stats.total_records));

    if !stats.records_by_strategy.is_empty() {
        out.push_str("\nRecords by strategy:\n");
        for (strategy, count) in &stats.records_by_strategy {
            let percentage = if stats.total_records > 0 {
                (*count as f64 / stats.total_records as f64) * 100.0
            } else {
                0.0
            };
            out.push_str(&format!("  {}: {} ({:.1}%)\n", strategy, count, percentage));
        }
    }
    out
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &SinkStatistics) {
    print!("{}", format_statistics(stats));
}
