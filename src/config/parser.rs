use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "crawl-bench.toml";

/// Environment variable overriding `sink.db-uri` (and enabling the sink)
pub const ENV_DB_URI: &str = "CRAWL_BENCH_DB_URI";
/// Environment variable overriding `thread-pool.pool-size`
pub const ENV_POOL_SIZE: &str = "CRAWL_BENCH_POOL_SIZE";
/// Environment variable overriding `http.timeout-seconds`
pub const ENV_TIMEOUT_SECONDS: &str = "CRAWL_BENCH_TIMEOUT_SECONDS";
/// Environment variable overriding `output.plot-path`
pub const ENV_OUTPUT_PATH: &str = "CRAWL_BENCH_OUTPUT_PATH";

/// Loads and parses a configuration file from the given path
///
/// Environment overrides are applied before validation.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use crawl_bench::config::load_config;
///
/// let config = load_config(Path::new("crawl-bench.toml")).unwrap();
/// println!("Pool size: {}", config.thread_pool.pool_size);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content, env_lookup)
}

/// Parses configuration text, applies overrides from `lookup` and validates
pub fn parse_config<F>(content: &str, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: Config = toml::from_str(content)?;
    apply_env_overrides(&mut config, lookup)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Recorded alongside the raw results so timings can be traced back to the
/// settings that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Resolves the configuration for a run
///
/// Uses `explicit` when given, else [`DEFAULT_CONFIG_FILE`] when it exists in
/// the working directory, else built-in defaults (with environment overrides).
/// The hash is `None` when no file was read.
pub fn resolve_config(explicit: Option<&Path>) -> Result<(Config, Option<String>), ConfigError> {
    let candidate = explicit
        .map(Path::to_path_buf)
        .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()));

    match candidate {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(&path)?;
            Ok((config, Some(hash)))
        }
        None => {
            tracing::info!("No configuration file found, using defaults");
            let mut config = Config::default();
            apply_env_overrides(&mut config, env_lookup)?;
            validate(&config)?;
            Ok((config, None))
        }
    }
}

/// Applies `CRAWL_BENCH_*` overrides on top of file or default values
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(uri) = lookup(ENV_DB_URI).filter(|v| !v.trim().is_empty()) {
        config.sink.db_uri = Some(uri);
        config.sink.enabled = true;
    }

    if let Some(value) = lookup(ENV_POOL_SIZE) {
        config.thread_pool.pool_size = parse_env(ENV_POOL_SIZE, &value)?;
    }

    if let Some(value) = lookup(ENV_TIMEOUT_SECONDS) {
        config.http.timeout_seconds = parse_env(ENV_TIMEOUT_SECONDS, &value)?;
    }

    if let Some(value) = lookup(ENV_OUTPUT_PATH).filter(|v| !v.trim().is_empty()) {
        config.output.plot_path = PathBuf::from(value);
    }

    Ok(())
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
    })
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
