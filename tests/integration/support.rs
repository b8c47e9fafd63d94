//! Shared fixtures for the integration tests

use crawl_bench::config::Config;
use crawl_bench::storage::{RecordSink, SinkError, SinkResult};
use crawl_bench::{ParsedRecord, StrategyKind};
use std::time::Duration;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Slow enough to trip the short client timeout used in tests
pub const SLOW_RESPONSE: Duration = Duration::from_secs(3);

/// A mock HTTP site plus the runtime serving it
///
/// `server` is declared first so it drops while the runtime is still alive.
pub struct MockSite {
    pub server: MockServer,
    runtime: Runtime,
}

impl MockSite {
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("Failed to build mock server runtime");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    /// Serves an HTML page at `route`
    pub fn page(&self, route: &str, html: &str) {
        self.mount(
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(html)
                        .insert_header("content-type", "text/html"),
                ),
        );
    }

    /// Serves an empty response with `status` at `route`
    pub fn status(&self, route: &str, status: u16) {
        self.mount(
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(status)),
        );
    }

    /// Serves a page at `route` only after `delay`
    pub fn slow_page(&self, route: &str, html: &str, delay: Duration) {
        self.mount(
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(html)
                        .insert_header("content-type", "text/html")
                        .set_delay(delay),
                ),
        );
    }

    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.server.uri(), route)
    }

    /// Number of requests the server has seen for `route`
    pub fn hits(&self, route: &str) -> usize {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == route)
            .count()
    }
}

/// Site with the three canonical pages: `/ok`, `/404`, `/timeout`
pub fn scenario_site() -> MockSite {
    let site = MockSite::start();
    site.page(
        "/ok",
        "<html><head><title>A</title></head><body><p>Hello from A</p></body></html>",
    );
    site.status("/404", 404);
    site.slow_page("/timeout", "<title>late</title>", SLOW_RESPONSE);
    site
}

/// Config over `urls` with timeouts short enough for tests
pub fn test_config(urls: Vec<String>) -> Config {
    let mut config = Config::with_urls(urls);
    config.http.timeout_seconds = 0.5;
    config.http.connect_timeout_seconds = 0.5;
    config.thread_pool.pool_size = 4;
    config
}

/// Sink that rejects every write
pub struct RejectingSink;

impl RecordSink for RejectingSink {
    fn write(&self, _record: &ParsedRecord, _strategy: StrategyKind) -> SinkResult<()> {
        Err(SinkError::Write("store unavailable".to_string()))
    }

    fn clear(&self) -> SinkResult<()> {
        Ok(())
    }

    fn count(&self) -> SinkResult<u64> {
        Ok(0)
    }

    fn count_by_strategy(&self) -> SinkResult<Vec<(String, u64)>> {
        Ok(Vec::new())
    }
}

/// Sink that panics when asked to store a page whose URL ends with `suffix`
pub struct PanickingSink {
    pub suffix: &'static str,
}

impl RecordSink for PanickingSink {
    fn write(&self, record: &ParsedRecord, _strategy: StrategyKind) -> SinkResult<()> {
        if record.url.ends_with(self.suffix) {
            panic!("sink blew up on {}", record.url);
        }
        Ok(())
    }

    fn clear(&self) -> SinkResult<()> {
        Ok(())
    }

    fn count(&self) -> SinkResult<u64> {
        Ok(0)
    }

    fn count_by_strategy(&self) -> SinkResult<Vec<(String, u64)>> {
        Ok(Vec::new())
    }
}
