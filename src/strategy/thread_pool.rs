//! Thread-pool strategy
//!
//! A fixed set of OS threads, scoped to one `run` call, pulls jobs from a
//! channel and sends each page result back over a second channel. The calling
//! thread is the only owner of the results and of the frontier.

use crate::config::{Config, CrawlConfig, HttpConfig};
use crate::crawler::{
    build_blocking_client, fetch_url_blocking, FetchErrorKind, Frontier, PageProcessor,
    PageResult,
};
use crate::storage::RecordSink;
use crate::strategy::{RunCollector, Strategy, StrategyKind, StrategyRun};
use crossbeam_channel::{unbounded, Receiver, Sender};
use reqwest::blocking::Client;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

/// Job handed to a worker: dispatch id and URL
type Job = (u64, String);

pub struct ThreadPoolRunner {
    http: HttpConfig,
    crawl: CrawlConfig,
    pool_size: usize,
}

impl ThreadPoolRunner {
    pub fn new(config: &Config) -> Self {
        Self {
            http: config.http.clone(),
            crawl: config.crawl.clone(),
            pool_size: config.thread_pool.pool_size.max(1),
        }
    }
}

impl Strategy for ThreadPoolRunner {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ThreadPool
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

        let (job_tx, job_rx) = unbounded::<Job>();
        let (result_tx, result_rx) = unbounded::<(u64, PageResult)>();

        tracing::debug!("[{}] Starting {} workers", self.kind(), self.pool_size);

        thread::scope(|scope| {
            for worker_id in 0..self.pool_size {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let client = client.clone();
                let processor = processor.clone();
                scope.spawn(move || worker_loop(worker_id, &client, &processor, job_rx, result_tx));
            }
            // Workers hold the only result senders from here on
            drop(result_tx);

            let mut pending: HashMap<u64, String> = HashMap::new();
            let mut next_id: u64 = 0;

            let mut dispatch = |frontier: &mut Frontier, pending: &mut HashMap<u64, String>| {
                while let Some(url) = frontier.next_url() {
                    let id = next_id;
                    next_id += 1;
                    pending.insert(id, url.clone());
                    if job_tx.send((id, url)).is_err() {
                        break;
                    }
                }
            };

            dispatch(&mut frontier, &mut pending);

            while !pending.is_empty() {
                let Ok((id, result)) = result_rx.recv() else {
                    break;
                };
                pending.remove(&id);
                let links = collector.record(result);
                if frontier.extend(links) > 0 {
                    dispatch(&mut frontier, &mut pending);
                }
            }

            // Jobs whose worker vanished without reporting back
            for (_, url) in pending.drain() {
                tracing::warn!("[{}] No result for {}", StrategyKind::ThreadPool, url);
                collector.record(PageResult::failed(url, FetchErrorKind::TaskFailed));
            }

            // Closing the job channel lets the workers exit so the scope can join them
            drop(dispatch);
            drop(job_tx);
        });

        Ok(collector.finish())
    }
}

fn worker_loop(
    worker_id: usize,
    client: &Client,
    processor: &PageProcessor,
    jobs: Receiver<Job>,
    results: Sender<(u64, PageResult)>,
) {
    for (id, url) in jobs.iter() {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            processor.process(fetch_url_blocking(client, &url))
        }))
        .unwrap_or_else(|_| {
            tracing::warn!("[worker {}] Job for {} panicked", worker_id, url);
            PageResult::failed(url.clone(), FetchErrorKind::TaskFailed)
        });

        if results.send((id, result)).is_err() {
            break;
        }
    }
    tracing::trace!("[worker {}] Exiting", worker_id);
}
