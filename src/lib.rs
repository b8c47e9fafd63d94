//! crawl-bench: concurrency strategy comparison for page fetching
//!
//! This crate fetches a fixed list of URLs under three concurrency models
//! (sequential, bounded thread pool, single-threaded event loop), optionally
//! persists the scraped content into a document store, and reports how long
//! each model took.

pub mod benchmark;
pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod strategy;

use thiserror::Error;

/// Main error type for crawl-bench operations
///
/// Per-URL failures never show up here; they are recorded as
/// [`crawler::FetchResult::Failure`] values. Only conditions that stop the
/// whole benchmark are errors.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sink error: {0}")]
    Sink(#[from] storage::SinkError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Failed to build event loop runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid value for environment variable {name}: {value}")]
    InvalidEnv { name: String, value: String },

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),
}

/// Result type alias for crawl-bench operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use benchmark::{run_benchmark, Benchmark, BenchmarkReport, RunTiming, TimingResult};
pub use config::Config;
pub use crawler::{CrawlOutcome, FetchErrorKind, FetchResult, ParsedRecord};
pub use strategy::{StrategyKind, StrategyRun};
