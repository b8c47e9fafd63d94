//! Benchmark driver
//!
//! Runs each enabled strategy over the same URL list, one run at a time, and
//! times every run. Strategies always run in the order sequential,
//! thread-pool, event-loop, whatever order the configuration lists them in.

mod timing;

pub use timing::{RunTiming, TimingResult};

use crate::config::Config;
use crate::storage::{open_sink, RecordSink};
use crate::strategy::{build_strategy, Strategy, StrategyKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

/// Everything a benchmark invocation measured
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub started_at: DateTime<Utc>,
    pub config_hash: Option<String>,
    pub urls: Vec<String>,
    pub results: Vec<TimingResult>,
}

impl BenchmarkReport {
    /// Strategies ordered fastest first by mean elapsed time
    pub fn ranking(&self) -> Vec<(StrategyKind, f64)> {
        let mut ranking: Vec<(StrategyKind, f64)> = self
            .results
            .iter()
            .map(|r| (r.strategy, r.mean_seconds()))
            .collect();
        ranking.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranking
    }

    pub fn fastest(&self) -> Option<StrategyKind> {
        self.ranking().first().map(|(kind, _)| *kind)
    }

    pub fn result_for(&self, strategy: StrategyKind) -> Option<&TimingResult> {
        self.results.iter().find(|r| r.strategy == strategy)
    }

    /// Whether every run of every strategy parsed the same set of URLs
    pub fn consistent(&self) -> bool {
        let mut sets = self
            .results
            .iter()
            .flat_map(|r| r.runs.iter())
            .map(|run| &run.parsed_urls);

        match sets.next() {
            Some(first) => sets.all(|set| set == first),
            None => true,
        }
    }

    /// URLs some but not all runs parsed
    pub fn disputed_urls(&self) -> BTreeSet<String> {
        let runs: Vec<&BTreeSet<String>> = self
            .results
            .iter()
            .flat_map(|r| r.runs.iter())
            .map(|run| &run.parsed_urls)
            .collect();

        let union: BTreeSet<String> = runs.iter().flat_map(|set| set.iter().cloned()).collect();
        union
            .into_iter()
            .filter(|url| !runs.iter().all(|set| set.contains(url)))
            .collect()
    }
}

/// Drives the strategies over one configuration
pub struct Benchmark {
    config: Config,
    sink: Option<Arc<dyn RecordSink>>,
    config_hash: Option<String>,
}

impl Benchmark {
    pub fn new(config: Config, sink: Option<Arc<dyn RecordSink>>) -> Self {
        Self {
            config,
            sink,
            config_hash: None,
        }
    }

    /// Records the hash of the config file the benchmark was loaded from
    pub fn with_config_hash(mut self, hash: Option<String>) -> Self {
        self.config_hash = hash;
        self
    }

    /// Enabled strategies, in run order
    pub fn strategies(&self) -> Vec<StrategyKind> {
        StrategyKind::ALL
            .into_iter()
            .filter(|kind| self.config.benchmark.strategies.contains(kind))
            .collect()
    }

    /// Runs every enabled strategy `repeats` times
    ///
    /// Must not be called from inside an async context.
    pub fn run(&self) -> crate::Result<BenchmarkReport> {
        let started_at = Utc::now();

        if let Some(sink) = &self.sink {
            if self.config.sink.clear_on_start {
                sink.clear()?;
                tracing::info!("Cleared document store before benchmarking");
            }
        }

        let strategies = self.strategies();
        tracing::info!(
            "Benchmarking {} strategies over {} URLs ({} repeats)",
            strategies.len(),
            self.config.urls.len(),
            self.config.benchmark.repeats
        );

        let mut results = Vec::with_capacity(strategies.len());
        for kind in strategies {
            let runner = build_strategy(kind, &self.config);
            results.push(self.time_strategy(runner.as_ref())?);
        }

        let report = BenchmarkReport {
            started_at,
            config_hash: self.config_hash.clone(),
            urls: self.config.urls.clone(),
            results,
        };

        if !report.consistent() {
            tracing::warn!(
                "Strategies disagree on which URLs parsed: {:?}",
                report.disputed_urls()
            );
        }

        Ok(report)
    }

    /// Times all repeats of one strategy
    pub fn time_strategy(&self, runner: &dyn Strategy) -> crate::Result<TimingResult> {
        let mut result = TimingResult::new(runner.kind());

        for repeat in 1..=self.config.benchmark.repeats {
            let start = Instant::now();
            let run = runner.run(&self.config.urls, self.sink.clone())?;
            let elapsed = start.elapsed();

            tracing::info!(
                "[{}] run {}/{}: {:.2}s ({}/{} succeeded)",
                runner.kind(),
                repeat,
                self.config.benchmark.repeats,
                elapsed.as_secs_f64(),
                run.succeeded(),
                run.total()
            );

            result.push(RunTiming::from_run(&run, elapsed));
        }

        Ok(result)
    }
}

/// Opens the configured sink and runs the whole benchmark
///
/// Must not be called from inside an async context.
pub fn run_benchmark(config: &Config) -> crate::Result<BenchmarkReport> {
    let sink = open_sink(&config.sink)?;
    Benchmark::new(config.clone(), sink).run()
}
