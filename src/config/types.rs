use crate::strategy::StrategyKind;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// URLs fetched when the configuration does not name any
pub const DEFAULT_URLS: &[&str] = &[
    "https://www.wikipedia.org/",
    "https://www.rust-lang.org/",
    "https://www.python.org/",
    "https://www.mozilla.org/",
    "https://example.com/",
];

/// Main configuration structure for crawl-bench
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// URL list shared by every strategy
    #[serde(default = "default_urls")]
    pub urls: Vec<String>,
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub thread_pool: ThreadPoolConfig,
    #[serde(default)]
    pub event_loop: EventLoopConfig,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            urls: default_urls(),
            benchmark: BenchmarkConfig::default(),
            http: HttpConfig::default(),
            crawl: CrawlConfig::default(),
            thread_pool: ThreadPoolConfig::default(),
            event_loop: EventLoopConfig::default(),
            sink: SinkConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Builds a default configuration over the given URL list
    pub fn with_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

fn default_urls() -> Vec<String> {
    DEFAULT_URLS.iter().map(|u| u.to_string()).collect()
}

/// Driver behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BenchmarkConfig {
    /// How many times each strategy is timed
    #[serde(default = "default_repeats")]
    pub repeats: u32,

    /// Strategies to run; always executed in the fixed driver order
    #[serde(default = "default_strategies")]
    pub strategies: Vec<StrategyKind>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            repeats: default_repeats(),
            strategies: default_strategies(),
        }
    }
}

fn default_repeats() -> u32 {
    1
}

fn default_strategies() -> Vec<StrategyKind> {
    StrategyKind::ALL.to_vec()
}

/// HTTP client settings shared by the blocking and async fetchers
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Per-fetch deadline, covering connect, headers and body
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: f64,

    #[serde(default = "default_timeout_seconds")]
    pub connect_timeout_seconds: f64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.connect_timeout_seconds)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_seconds() -> f64 {
    5.0
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

/// What each strategy extracts and whether it follows links
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Length of the visible-text snippet, in characters
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,

    /// Queue links discovered on fetched pages in addition to the URL list
    #[serde(default)]
    pub follow_links: bool,

    /// Upper bound on pages fetched per run when following links
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            snippet_chars: default_snippet_chars(),
            follow_links: false,
            max_pages: default_max_pages(),
        }
    }
}

fn default_snippet_chars() -> usize {
    500
}

fn default_max_pages() -> usize {
    100
}

/// Thread-pool strategy settings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ThreadPoolConfig {
    /// Number of worker threads
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
        }
    }
}

fn default_pool_size() -> usize {
    10
}

/// Event-loop strategy settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EventLoopConfig {
    /// Maximum fetches in flight at once (0 = unlimited)
    #[serde(default)]
    pub concurrency: usize,

    /// Deadline for the whole run; outstanding tasks are cancelled when it passes
    #[serde(default)]
    pub global_timeout_seconds: Option<f64>,
}

impl EventLoopConfig {
    pub fn global_timeout(&self) -> Option<Duration> {
        self.global_timeout_seconds.map(Duration::from_secs_f64)
    }
}

/// Document store settings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SinkConfig {
    #[serde(default)]
    pub enabled: bool,

    /// SQLite file path, `sqlite://<path>`, or `:memory:`
    #[serde(default)]
    pub db_uri: Option<String>,

    /// Empty the collection before the first strategy runs
    #[serde(default = "default_true")]
    pub clear_on_start: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            db_uri: None,
            clear_on_start: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Output artifact locations
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    #[serde(default = "default_plot_path")]
    pub plot_path: PathBuf,

    #[serde(default = "default_raw_results_path")]
    pub raw_results_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            plot_path: default_plot_path(),
            raw_results_path: default_raw_results_path(),
        }
    }
}

fn default_plot_path() -> PathBuf {
    PathBuf::from("results/benchmark_plot.svg")
}

fn default_raw_results_path() -> PathBuf {
    PathBuf::from("results/raw_results.json")
}
