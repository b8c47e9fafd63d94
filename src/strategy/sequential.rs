//! Sequential strategy: one URL at a time on the calling thread

use crate::config::{Config, CrawlConfig, HttpConfig};
use crate::crawler::{build_blocking_client, fetch_url_blocking, Frontier, PageProcessor};
use crate::storage::RecordSink;
use crate::strategy::{RunCollector, Strategy, StrategyKind, StrategyRun};
use std::sync::Arc;

/// Fetches, parses and persists each URL in order with a blocking client
///
/// Total time is roughly the sum of per-request latencies.
pub struct SequentialRunner {
    http: HttpConfig,
    crawl: CrawlConfig,
}

impl SequentialRunner {
    pub fn new(config: &Config) -> Self {
        Self {
            http: config.http.clone(),
            crawl: config.crawl.clone(),
        }
    }
}

impl Strategy for SequentialRunner {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Sequential
    }

    fn run(
        &self,
        urls: &[String],
        sink: Option<Arc<dyn RecordSink>>,
    ) -> crate::Result<StrategyRun> {
        let client = build_blocking_client(&self.http)?;
        let processor = PageProcessor::new(
            self.kind(),
            self.crawl.snippet_chars,
            self.crawl.follow_links,
            sink,
        );
        let mut frontier = Frontier::new(urls, self.crawl.follow_links, self.crawl.max_pages);
        let mut collector = RunCollector::new(self.kind());

        while let Some(url) = frontier.next_url() {
            let result = processor.process(fetch_url_blocking(&client, &url));
            let links = collector.record(result);
            frontier.extend(links);
        }

        Ok(collector.finish())
    }
}
