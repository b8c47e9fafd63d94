//! Raw results as JSON
//!
//! Every run's timing plus a per-strategy summary, so a later comparison does
//! not need to rerun the benchmark.

use crate::benchmark::BenchmarkReport;
use crate::output::traits::{OutputResult, ReportWriter};
use crate::strategy::StrategyKind;
use serde::Serialize;

#[derive(Serialize)]
struct RawResults<'a> {
    #[serde(flatten)]
    report: &'a BenchmarkReport,
    summary: Vec<StrategySummary>,
    ranking: Vec<StrategyKind>,
    consistent: bool,
}

#[derive(Serialize)]
struct StrategySummary {
    strategy: StrategyKind,
    mean_seconds: f64,
    min_seconds: f64,
    max_seconds: f64,
    succeeded: usize,
    total: usize,
    sink_failures: usize,
}

/// Writes the raw results file
pub struct JsonResultsWriter;

impl ReportWriter for JsonResultsWriter {
    fn name(&self) -> &'static str {
        "raw results"
    }

    fn render(&self, report: &BenchmarkReport) -> OutputResult<String> {
        let summary = report
            .results
            .iter()
            .map(|r| {
                let (succeeded, total) = r.latest_counts();
                StrategySummary {
                    strategy: r.strategy,
                    mean_seconds: r.mean_seconds(),
                    min_seconds: r.min_seconds(),
                    max_seconds: r.max_seconds(),
                    succeeded,
                    total,
                    sink_failures: r.sink_failures(),
                }
            })
            .collect();

        let raw = RawResults {
            report,
            summary,
            ranking: report.ranking().into_iter().map(|(kind, _)| kind).collect(),
            consistent: report.consistent(),
        };

        Ok(serde_json::to_string_pretty(&raw)?)
    }
}
