//! Per-page pipeline shared by every strategy
//!
//! Turns one [`FetchResult`] into a [`CrawlOutcome`]: parse the body, build
//! the [`ParsedRecord`], hand it to the sink. Strategies only decide *where*
//! this runs (calling thread, pool worker, event-loop task).

use crate::crawler::fetcher::{FetchErrorKind, FetchResult};
use crate::crawler::parser::parse_html;
use crate::storage::RecordSink;
use crate::strategy::StrategyKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

/// Content scraped from one successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    pub url: String,
    pub title: String,
    pub text: String,
    pub fetched_at: DateTime<Utc>,
}

/// What a strategy run yields for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    Parsed {
        record: ParsedRecord,
        status_code: u16,
    },
    Failed {
        url: String,
        error: FetchErrorKind,
    },
}

impl CrawlOutcome {
    pub fn url(&self) -> &str {
        match self {
            Self::Parsed { record, .. } => &record.url,
            Self::Failed { url, .. } => url,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed { .. })
    }

    pub fn record(&self) -> Option<&ParsedRecord> {
        match self {
            Self::Parsed { record, .. } => Some(record),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<FetchErrorKind> {
        match self {
            Self::Parsed { .. } => None,
            Self::Failed { error, .. } => Some(*error),
        }
    }

    /// Outcome for a URL whose task never reported back
    pub fn failed(url: impl Into<String>, error: FetchErrorKind) -> Self {
        Self::Failed {
            url: url.into(),
            error,
        }
    }
}

/// Outcome of one page plus what the owner loop needs to continue
#[derive(Debug, Clone)]
pub struct PageResult {
    pub outcome: CrawlOutcome,

    /// Links to queue; empty unless link following is on
    pub links: Vec<String>,

    /// The sink rejected this page's record
    pub sink_failed: bool,
}

impl PageResult {
    /// A result carrying only a failure, no links
    pub fn failed(url: impl Into<String>, error: FetchErrorKind) -> Self {
        Self {
            outcome: CrawlOutcome::failed(url, error),
            links: Vec::new(),
            sink_failed: false,
        }
    }
}

/// Parses fetched pages and persists them
///
/// Cheap to clone; each pool worker or event-loop task holds its own copy.
#[derive(Clone)]
pub struct PageProcessor {
    strategy: StrategyKind,
    snippet_chars: usize,
    follow_links: bool,
    sink: Option<Arc<dyn RecordSink>>,
}

impl PageProcessor {
    pub fn new(
        strategy: StrategyKind,
        snippet_chars: usize,
        follow_links: bool,
        sink: Option<Arc<dyn RecordSink>>,
    ) -> Self {
        Self {
            strategy,
            snippet_chars,
            follow_links,
            sink,
        }
    }

    /// Processes one fetch result
    ///
    /// Never fails: parse problems yield empty fields, sink problems are
    /// logged and flagged on the result.
    pub fn process(&self, fetch: FetchResult) -> PageResult {
        let (url, status_code, body) = match fetch {
            FetchResult::Success {
                url,
                status_code,
                body,
            } => (url, status_code, body),
            FetchResult::Failure { url, error } => {
                tracing::debug!("[{}] {} failed: {}", self.strategy, url, error);
                return PageResult::failed(url, error);
            }
        };

        let base_url = if self.follow_links {
            Url::parse(&url).ok()
        } else {
            None
        };
        let parsed = parse_html(&body, base_url.as_ref(), self.snippet_chars);

        let record = ParsedRecord {
            url,
            title: parsed.title,
            text: parsed.text,
            fetched_at: Utc::now(),
        };
        tracing::debug!(
            "[{}] {} parsed (title: {:?})",
            self.strategy,
            record.url,
            record.title
        );

        let sink_failed = match &self.sink {
            Some(sink) => match sink.write(&record, self.strategy) {
                Ok(()) => false,
                Err(e) => {
                    tracing::warn!(
                        "[{}] Failed to persist {}: {}",
                        self.strategy,
                        record.url,
                        e
                    );
                    true
                }
            },
            None => false,
        };

        PageResult {
            outcome: CrawlOutcome::Parsed {
                record,
                status_code,
            },
            links: parsed.links,
            sink_failed,
        }
    }
}
