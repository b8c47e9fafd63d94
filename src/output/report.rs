//! Console report
//!
//! Formats a finished benchmark for the terminal: per-strategy timing and
//! success counts, the ranking, and a note when strategies disagreed on which
//! URLs parsed.

use crate::benchmark::BenchmarkReport;

/// Formats the report as plain text
pub fn format_report(report: &BenchmarkReport) -> String {
    let mut out = String::new();

    out.push_str("=== Crawler Benchmark ===\n\n");
    out.push_str(&format!("Started: {}\n", report.started_at.to_rfc3339()));
    if let Some(hash) = &report.config_hash {
        out.push_str(&format!("Config hash: {}\n", hash));
    }
    out.push_str(&format!("URLs: {}\n\n", report.urls.len()));

    out.push_str("Results:\n");
    for result in &report.results {
        let (succeeded, total) = result.latest_counts();
        out.push_str(&format!(
            "  {:<12} {:>8.3}s mean  ({:.3}s min, {:.3}s max, {} runs)  {}/{} succeeded",
            result.strategy.as_str(),
            result.mean_seconds(),
            result.min_seconds(),
            result.max_seconds(),
            result.runs.len(),
            succeeded,
            total
        ));
        let sink_failures = result.sink_failures();
        if sink_failures > 0 {
            out.push_str(&format!("  [{} sink failures]", sink_failures));
        }
        out.push('\n');
    }

    let ranking = report.ranking();
    if !ranking.is_empty() {
        out.push_str("\nRanking (fastest first):\n");
        for (place, (strategy, mean)) in ranking.iter().enumerate() {
            out.push_str(&format!("  {}. {} ({:.3}s)\n", place + 1, strategy, mean));
        }
    }

    if !report.consistent() {
        out.push_str("\nWarning: strategies parsed different URL sets:\n");
        for url in report.disputed_urls() {
            out.push_str(&format!("  - {}\n", url));
        }
    }

    out
}

/// Prints the report to stdout
pub fn print_report(report: &BenchmarkReport) {
    print!("{}", format_report(report));
}
