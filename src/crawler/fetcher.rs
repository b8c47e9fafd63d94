//! HTTP fetcher implementation
//!
//! This module handles every HTTP request the strategies make:
//! - Building async and blocking clients from the shared HTTP settings
//! - One GET per URL, no retries
//! - Classifying failures into [`FetchErrorKind`]
//!
//! The sequential and thread-pool strategies use the blocking flavour, the
//! event-loop strategy the async one. Both report through the same
//! [`FetchResult`] so strategy choice never changes what a URL yields.

use crate::config::HttpConfig;
use reqwest::{blocking, Client, StatusCode};
use serde::Serialize;
use std::fmt;

/// Why a fetch did not produce a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// No complete response within the deadline
    Timeout,
    /// Refused, DNS, TLS, body read, or any other transport failure
    ConnectionError,
    /// Response arrived with a non-2xx status
    HttpError(u16),
    /// The worker or task handling the URL panicked
    TaskFailed,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::ConnectionError => write!(f, "connection error"),
            Self::HttpError(status) => write!(f, "HTTP {}", status),
            Self::TaskFailed => write!(f, "task failed"),
        }
    }
}

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// The requested URL
        url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Fetch failed; never retried
    Failure {
        /// The requested URL
        url: String,
        /// Failure classification
        error: FetchErrorKind,
    },
}

impl FetchResult {
    /// The URL this result belongs to
    pub fn url(&self) -> &str {
        match self {
            Self::Success { url, .. } | Self::Failure { url, .. } => url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Builds the async HTTP client used by the event-loop strategy
///
/// # Example
///
/// ```no_run
/// use crawl_bench::config::HttpConfig;
/// use crawl_bench::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the blocking HTTP client used by the sequential and thread-pool
/// strategies
///
/// Must not be called from inside an async context.
pub fn build_blocking_client(config: &HttpConfig) -> Result<blocking::Client, reqwest::Error> {
    blocking::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with the async client
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with readable body | `Success` |
/// | Non-2xx status | `Failure(HttpError(status))` |
/// | Deadline exceeded | `Failure(Timeout)` |
/// | Anything else | `Failure(ConnectionError)` |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return failure(url, &e),
    };

    let status = response.status();
    if let Some(error) = classify_status(status) {
        return FetchResult::Failure {
            url: url.to_string(),
            error,
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            url: url.to_string(),
            status_code: status.as_u16(),
            body,
        },
        Err(e) => failure(url, &e),
    }
}

/// Fetches a URL with the blocking client
///
/// Same classification as [`fetch_url`].
pub fn fetch_url_blocking(client: &blocking::Client, url: &str) -> FetchResult {
    let response = match client.get(url).send() {
        Ok(response) => response,
        Err(e) => return failure(url, &e),
    };

    let status = response.status();
    if let Some(error) = classify_status(status) {
        return FetchResult::Failure {
            url: url.to_string(),
            error,
        };
    }

    match response.text() {
        Ok(body) => FetchResult::Success {
            url: url.to_string(),
            status_code: status.as_u16(),
            body,
        },
        Err(e) => failure(url, &e),
    }
}

fn classify_status(status: StatusCode) -> Option<FetchErrorKind> {
    if status.is_success() {
        None
    } else {
        Some(FetchErrorKind::HttpError(status.as_u16()))
    }
}

fn classify_error(error: &reqwest::Error) -> FetchErrorKind {
    if error.is_timeout() {
        FetchErrorKind::Timeout
    } else if let Some(status) = error.status() {
        FetchErrorKind::HttpError(status.as_u16())
    } else {
        FetchErrorKind::ConnectionError
    }
}

fn failure(url: &str, error: &reqwest::Error) -> FetchResult {
    let kind = classify_error(error);
    tracing::debug!("Fetch failed for {}: {} ({})", url, kind, error);
    FetchResult::Failure {
        url: url.to_string(),
        error: kind,
    }
}
