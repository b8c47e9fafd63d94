//! Event-loop strategy
//!
//! One `current_thread` tokio runtime per `run` call. Every dispatched URL
//! becomes a task in a [`JoinSet`]; the seeds are all spawned before the first
//! await so their I/O interleaves. The runtime is dropped before `run`
//! returns.

use crate::config::{Config, CrawlConfig, HttpConfig};
use crate::crawler::{
    build_http_client, fetch_url, FetchErrorKind, Frontier, PageProcessor, PageResult,
};
use crate::storage::RecordSink;
use crate::strategy::{RunCollector, Strategy, StrategyKind, StrategyRun};
use crate::BenchError;
use futures::FutureExt;
use reqwest::Client;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;

pub struct EventLoopRunner {
    http: HttpConfig,
    crawl: CrawlConfig,
    concurrency: usize,
    global_timeout: Option<Duration>,
}

impl EventLoopRunner {
    pub fn new(config: &Config) -> Self {
        Self {
            http: config.http.clone(),
            crawl: config.crawl.clone(),
            concurrency: config.event_loop.concurrency,
            global_timeout: config.event_loop.global_timeout(),
        }
    }

    async fn run_tasks(
        &self,
        urls: &[String],
        sink: Option<Arc<dyn RecordSink>>,
    ) -> crate::Result<StrategyRun> {
        let mut spawner = TaskSpawner {
            client: build_http_client(&self.http)?,
            processor: PageProcessor::new(
                self.kind(),
                self.crawl.snippet_chars,
                self.crawl.follow_links,
                sink,
            ),
            limiter: (self.concurrency > 0).then(|| Arc::new(Semaphore::new(self.concurrency))),
            next_id: 0,
            pending: HashMap::new(),
        };
        let mut frontier = Frontier::new(urls, self.crawl.follow_links, self.crawl.max_pages);
        let mut collector = RunCollector::new(self.kind());
        let mut tasks: JoinSet<(u64, PageResult)> = JoinSet::new();
        // A deadline past what Instant can represent means no deadline
        let deadline = self
            .global_timeout
            .and_then(|timeout| Instant::now().checked_add(timeout));

        spawner.spawn_from(&mut frontier, &mut tasks);

        let mut timed_out = false;
        while !tasks.is_empty() {
            let joined = match deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, tasks.join_next()).await
                {
                    Ok(joined) => joined,
                    Err(_) => {
                        timed_out = true;
                        break;
                    }
                },
                None => tasks.join_next().await,
            };

            match joined {
                Some(Ok((id, result))) => {
                    spawner.pending.remove(&id);
                    let links = collector.record(result);
                    if frontier.extend(links) > 0 {
                        spawner.spawn_from(&mut frontier, &mut tasks);
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!("[{}] Task ended without a result: {}", self.kind(), e);
                }
                None => break,
            }
        }

        if timed_out {
            tracing::warn!(
                "[{}] Global timeout reached with {} URLs outstanding, cancelling",
                self.kind(),
                spawner.pending.len()
            );
            tasks.abort_all();
            // Tasks that finished before the abort still report their result
            while let Some(joined) = tasks.join_next().await {
                if let Ok((id, result)) = joined {
                    spawner.pending.remove(&id);
                    collector.record(result);
                }
            }
        }

        let leftover_kind = if timed_out {
            FetchErrorKind::Timeout
        } else {
            FetchErrorKind::TaskFailed
        };
        let mut leftovers: Vec<(u64, String)> = spawner.pending.drain().collect();
        leftovers.sort_unstable_by_key(|(id, _)| *id);
        for (_, url) in leftovers {
            collector.record(PageResult::failed(url, leftover_kind));
        }

        Ok(collector.finish())
    }
}

impl Strategy for EventLoopRunner {
    fn kind(&self) -> StrategyKind {
        StrategyKind::EventLoop
    }

    fn run(
        &self,
        urls: &[String],
        sink: Option<Arc<dyn RecordSink>>,
    ) -> crate::Result<StrategyRun> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(BenchError::Runtime)?;

        let run = runtime.block_on(self.run_tasks(urls, sink));
        drop(runtime);
        run
    }
}

/// Turns frontier URLs into tasks and remembers which are still in flight
struct TaskSpawner {
    client: Client,
    processor: PageProcessor,
    limiter: Option<Arc<Semaphore>>,
    next_id: u64,
    pending: HashMap<u64, String>,
}

impl TaskSpawner {
    fn spawn_from(&mut self, frontier: &mut Frontier, tasks: &mut JoinSet<(u64, PageResult)>) {
        while let Some(url) = frontier.next_url() {
            let id = self.next_id;
            self.next_id += 1;
            self.pending.insert(id, url.clone());

            let client = self.client.clone();
            let processor = self.processor.clone();
            let limiter = self.limiter.clone();

            tasks.spawn(async move {
                let work = async {
                    let _permit = match limiter {
                        Some(limiter) => limiter.acquire_owned().await.ok(),
                        None => None,
                    };
                    processor.process(fetch_url(&client, &url).await)
                };

                let result = AssertUnwindSafe(work)
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        tracing::warn!("[{}] Task for {} panicked", StrategyKind::EventLoop, url);
                        PageResult::failed(url.clone(), FetchErrorKind::TaskFailed)
                    });

                (id, result)
            });
        }
    }
}
