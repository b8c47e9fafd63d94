//! Output module for benchmark reports and artifacts
//!
//! This module handles:
//! - The console report with per-strategy success counts and ranking
//! - Raw per-run timings as JSON
//! - The SVG bar chart
//! - Document-store statistics for `--stats`

mod chart;
mod json;
mod report;
pub mod stats;
mod traits;

pub use chart::{render_chart, SvgChartWriter};
pub use json::JsonResultsWriter;
pub use report::{format_report, print_report};
pub use stats::{load_statistics, print_statistics, SinkStatistics};
pub use traits::{write_file, OutputError, OutputResult, ReportWriter};

use crate::benchmark::BenchmarkReport;
use crate::config::OutputConfig;

/// Writes the raw results file and the chart
pub fn write_artifacts(report: &BenchmarkReport, config: &OutputConfig) -> OutputResult<()> {
    JsonResultsWriter.write(report, &config.raw_results_path)?;
    SvgChartWriter::default().write(report, &config.plot_path)?;
    Ok(())
}
