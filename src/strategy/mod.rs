//! Strategy runners
//!
//! Each runner drives the same fetch+parse workload over a URL list under one
//! concurrency model:
//! - [`SequentialRunner`]: one thread, fully blocking
//! - [`ThreadPoolRunner`]: fixed pool of OS threads fed through a channel
//! - [`EventLoopRunner`]: one thread, cooperative tasks on a tokio runtime
//!
//! Every runner yields exactly one [`CrawlOutcome`] per URL it dispatches and
//! tears down its threads or runtime before returning.

mod event_loop;
mod sequential;
mod thread_pool;

pub use event_loop::EventLoopRunner;
pub use sequential::SequentialRunner;
pub use thread_pool::ThreadPoolRunner;

use crate::config::Config;
use crate::crawler::{CrawlOutcome, PageResult};
use crate::storage::RecordSink;
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// One of the three concurrency models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Sequential,
    ThreadPool,
    EventLoop,
}

impl StrategyKind {
    /// All strategies, in the order the driver runs them
    pub const ALL: [StrategyKind; 3] = [Self::Sequential, Self::ThreadPool, Self::EventLoop];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::ThreadPool => "thread-pool",
            Self::EventLoop => "event-loop",
        }
    }

    /// Short label used on the chart axis
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sequential => "Single",
            Self::ThreadPool => "Threads",
            Self::EventLoop => "Event loop",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "single" => Ok(Self::Sequential),
            "thread-pool" | "threads" | "thread_pool" => Ok(Self::ThreadPool),
            "event-loop" | "async" | "event_loop" => Ok(Self::EventLoop),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Output of one runner invocation
#[derive(Debug, Clone)]
pub struct StrategyRun {
    pub strategy: StrategyKind,

    /// One entry per dispatched URL, in completion order
    pub outcomes: Vec<CrawlOutcome>,

    /// Records the sink rejected; the records still count as parsed
    pub sink_failures: usize,
}

impl StrategyRun {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_parsed()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// URLs that produced a parsed record
    pub fn parsed_urls(&self) -> BTreeSet<String> {
        self.outcomes
            .iter()
            .filter(|o| o.is_parsed())
            .map(|o| o.url().to_string())
            .collect()
    }

    /// Finds the outcome for a URL
    pub fn outcome_for(&self, url: &str) -> Option<&CrawlOutcome> {
        self.outcomes.iter().find(|o| o.url() == url)
    }
}

/// A concurrency model that can run the workload
pub trait Strategy {
    fn kind(&self) -> StrategyKind;

    /// Fetches and parses every URL, writing records to `sink` when given
    ///
    /// Per-URL failures are recorded in the returned outcomes. `Err` means
    /// the runner could not start at all (client or runtime construction).
    /// Must not be called from inside an async context.
    fn run(
        &self,
        urls: &[String],
        sink: Option<Arc<dyn RecordSink>>,
    ) -> crate::Result<StrategyRun>;
}

/// Builds the runner for a strategy from the shared configuration
pub fn build_strategy(kind: StrategyKind, config: &Config) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::Sequential => Box::new(SequentialRunner::new(config)),
        StrategyKind::ThreadPool => Box::new(ThreadPoolRunner::new(config)),
        StrategyKind::EventLoop => Box::new(EventLoopRunner::new(config)),
    }
}

/// Accumulates page results for the single owner of a run
pub(crate) struct RunCollector {
    strategy: StrategyKind,
    outcomes: Vec<CrawlOutcome>,
    sink_failures: usize,
}

impl RunCollector {
    pub(crate) fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            outcomes: Vec::new(),
            sink_failures: 0,
        }
    }

    /// Stores the outcome and hands back the page's discovered links
    pub(crate) fn record(&mut self, result: PageResult) -> Vec<String> {
        if result.sink_failed {
            self.sink_failures += 1;
        }
        self.outcomes.push(result.outcome);
        result.links
    }

    pub(crate) fn finish(self) -> StrategyRun {
        let run = StrategyRun {
            strategy: self.strategy,
            outcomes: self.outcomes,
            sink_failures: self.sink_failures,
        };
        tracing::info!(
            "[{}] {}/{} succeeded ({} sink failures)",
            run.strategy,
            run.succeeded(),
            run.total(),
            run.sink_failures
        );
        run
    }
}
