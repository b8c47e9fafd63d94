//! Timing records kept by the benchmark driver

use crate::strategy::{StrategyKind, StrategyRun};
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Duration;

/// One timed runner invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunTiming {
    pub elapsed_seconds: f64,
    pub succeeded: usize,
    pub total: usize,
    pub sink_failures: usize,

    #[serde(skip)]
    pub parsed_urls: BTreeSet<String>,
}

impl RunTiming {
    pub fn from_run(run: &StrategyRun, elapsed: Duration) -> Self {
        Self {
            elapsed_seconds: elapsed.as_secs_f64(),
            succeeded: run.succeeded(),
            total: run.total(),
            sink_failures: run.sink_failures,
            parsed_urls: run.parsed_urls(),
        }
    }
}

/// All timed runs of one strategy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingResult {
    pub strategy: StrategyKind,
    pub runs: Vec<RunTiming>,
}

impl TimingResult {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            runs: Vec::new(),
        }
    }

    pub fn push(&mut self, timing: RunTiming) {
        self.runs.push(timing);
    }

    /// Mean elapsed seconds; 0 with no runs
    pub fn mean_seconds(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        self.total_seconds() / self.runs.len() as f64
    }

    pub fn min_seconds(&self) -> f64 {
        self.runs
            .iter()
            .map(|r| r.elapsed_seconds)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    pub fn max_seconds(&self) -> f64 {
        self.runs
            .iter()
            .map(|r| r.elapsed_seconds)
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    pub fn total_seconds(&self) -> f64 {
        self.runs.iter().map(|r| r.elapsed_seconds).sum()
    }

    /// Success count of the latest run as `(succeeded, total)`
    pub fn latest_counts(&self) -> (usize, usize) {
        self.runs
            .last()
            .map(|r| (r.succeeded, r.total))
            .unwrap_or((0, 0))
    }

    pub fn sink_failures(&self) -> usize {
        self.runs.iter().map(|r| r.sink_failures).sum()
    }
}
