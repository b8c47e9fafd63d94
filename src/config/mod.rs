//! Configuration module for crawl-bench
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, plus the `CRAWL_BENCH_*` environment overrides.
//!
//! # Example
//!
//! ```no_run
//! use crawl_bench::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl-bench.toml")).unwrap();
//! println!("Thread pool will use {} workers", config.thread_pool.pool_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BenchmarkConfig, Config, CrawlConfig, EventLoopConfig, HttpConfig, OutputConfig, SinkConfig,
    ThreadPoolConfig, DEFAULT_URLS,
};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, compute_config_hash, load_config, load_config_with_hash, parse_config,
    resolve_config, DEFAULT_CONFIG_FILE, ENV_DB_URI, ENV_OUTPUT_PATH, ENV_POOL_SIZE,
    ENV_TIMEOUT_SECONDS,
};
