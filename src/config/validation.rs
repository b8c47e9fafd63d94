use crate::config::types::{
    BenchmarkConfig, Config, CrawlConfig, EventLoopConfig, HttpConfig, OutputConfig, SinkConfig,
    ThreadPoolConfig,
};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Longest timeout accepted for any setting (one day)
const MAX_TIMEOUT_SECONDS: f64 = 86_400.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_urls(&config.urls)?;
    validate_benchmark_config(&config.benchmark)?;
    validate_http_config(&config.http)?;
    validate_crawl_config(&config.crawl)?;
    validate_thread_pool_config(&config.thread_pool)?;
    validate_event_loop_config(&config.event_loop)?;
    validate_sink_config(&config.sink)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Every URL must parse and use an HTTP(S) scheme. An empty list is allowed.
fn validate_urls(urls: &[String]) -> Result<(), ConfigError> {
    for raw in urls {
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", raw, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "'{}' must use the http or https scheme",
                raw
            )));
        }
    }
    Ok(())
}

fn validate_benchmark_config(config: &BenchmarkConfig) -> Result<(), ConfigError> {
    if config.repeats < 1 {
        return Err(ConfigError::Validation(format!(
            "repeats must be >= 1, got {}",
            config.repeats
        )));
    }

    if config.strategies.is_empty() {
        return Err(ConfigError::Validation(
            "at least one strategy must be enabled".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    validate_seconds("timeout_seconds", config.timeout_seconds)?;
    validate_seconds("connect_timeout_seconds", config.connect_timeout_seconds)?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.snippet_chars < 1 {
        return Err(ConfigError::Validation(
            "snippet_chars must be >= 1".to_string(),
        ));
    }

    if config.follow_links && config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when follow_links is enabled".to_string(),
        ));
    }

    Ok(())
}

fn validate_thread_pool_config(config: &ThreadPoolConfig) -> Result<(), ConfigError> {
    if config.pool_size < 1 || config.pool_size > 1024 {
        return Err(ConfigError::Validation(format!(
            "pool_size must be between 1 and 1024, got {}",
            config.pool_size
        )));
    }
    Ok(())
}

fn validate_event_loop_config(config: &EventLoopConfig) -> Result<(), ConfigError> {
    if let Some(seconds) = config.global_timeout_seconds {
        validate_seconds("global_timeout_seconds", seconds)?;
    }
    Ok(())
}

/// A sink that is switched on needs somewhere to write
fn validate_sink_config(config: &SinkConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        return Ok(());
    }

    match config.db_uri.as_deref().map(str::trim) {
        Some(uri) if !uri.is_empty() => Ok(()),
        _ => Err(ConfigError::Validation(
            "sink is enabled but db_uri is not set".to_string(),
        )),
    }
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.plot_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "plot_path cannot be empty".to_string(),
        ));
    }

    if config.raw_results_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "raw_results_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_seconds(name: &str, seconds: f64) -> Result<(), ConfigError> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "{} must be a positive number of seconds, got {}",
            name, seconds
        )));
    }

    if seconds > MAX_TIMEOUT_SECONDS || Duration::try_from_secs_f64(seconds).is_err() {
        return Err(ConfigError::Validation(format!(
            "{} must be at most {} seconds, got {}",
            name, MAX_TIMEOUT_SECONDS, seconds
        )));
    }
    Ok(())
}
