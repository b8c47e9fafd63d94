//! Every strategy against the same mocked site

use crate::support::{
    scenario_site, test_config, MockSite, PanickingSink, RejectingSink, SLOW_RESPONSE,
};
use crawl_bench::storage::{MemorySink, RecordSink, SqliteSink};
use crawl_bench::strategy::{build_strategy, EventLoopRunner, Strategy, ThreadPoolRunner};
use crawl_bench::{CrawlOutcome, FetchErrorKind, StrategyKind};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn test_ok_404_timeout_scenario_every_strategy() {
    let site = scenario_site();
    let urls = vec![site.url("/ok"), site.url("/404"), site.url("/timeout")];
    let config = test_config(urls.clone());

    for kind in StrategyKind::ALL {
        let run = build_strategy(kind, &config).run(&urls, None).unwrap();

        assert_eq!(run.strategy, kind);
        assert_eq!(run.total(), 3, "{} dropped or duplicated an outcome", kind);
        assert_eq!(run.succeeded(), 1, "{}", kind);

        match run.outcome_for(&urls[0]) {
            Some(CrawlOutcome::Parsed {
                record,
                status_code,
            }) => {
                assert_eq!(record.title, "A");
                assert_eq!(record.text, "Hello from A");
                assert_eq!(*status_code, 200);
            }
            other => panic!("{}: expected parsed /ok, got {:?}", kind, other),
        }
        assert_eq!(
            run.outcome_for(&urls[1]).and_then(|o| o.error()),
            Some(FetchErrorKind::HttpError(404)),
            "{}",
            kind
        );
        assert_eq!(
            run.outcome_for(&urls[2]).and_then(|o| o.error()),
            Some(FetchErrorKind::Timeout),
            "{}",
            kind
        );
    }
}

#[test]
fn test_timeout_does_not_end_sequential_run() {
    let site = scenario_site();
    // Timeout first so later URLs depend on the run continuing
    let urls = vec![site.url("/timeout"), site.url("/ok"), site.url("/404")];
    let config = test_config(urls.clone());

    let run = build_strategy(StrategyKind::Sequential, &config)
        .run(&urls, None)
        .unwrap();

    let order: Vec<&str> = run.outcomes.iter().map(|o| o.url()).collect();
    assert_eq!(order, urls.iter().map(String::as_str).collect::<Vec<_>>());
    assert_eq!(run.outcomes[0].error(), Some(FetchErrorKind::Timeout));
    assert!(run.outcomes[1].is_parsed());
}

#[test]
fn test_all_strategies_parse_same_url_set() {
    let site = MockSite::start();
    for i in 0..6 {
        site.page(
            &format!("/page/{}", i),
            &format!("<title>Page {}</title><p>body {}</p>", i, i),
        );
    }
    site.status("/gone", 410);
    site.status("/broken", 500);

    let mut urls: Vec<String> = (0..6).map(|i| site.url(&format!("/page/{}", i))).collect();
    urls.push(site.url("/gone"));
    urls.push(site.url("/broken"));
    let config = test_config(urls.clone());

    let parsed: Vec<BTreeSet<String>> = StrategyKind::ALL
        .into_iter()
        .map(|kind| {
            build_strategy(kind, &config)
                .run(&urls, None)
                .unwrap()
                .parsed_urls()
        })
        .collect();

    assert_eq!(parsed[0].len(), 6);
    assert_eq!(parsed[0], parsed[1]);
    assert_eq!(parsed[0], parsed[2]);
}

#[test]
fn test_thread_pool_one_outcome_per_url() {
    let site = MockSite::start();
    site.page("/p", "<title>P</title>");
    site.status("/missing", 404);

    for url_count in [0usize, 1, 7] {
        // Every third URL fails; the last one repeats the first
        let mut urls: Vec<String> = (0..url_count)
            .map(|i| {
                if i % 3 == 2 {
                    site.url("/missing")
                } else {
                    site.url("/p")
                }
            })
            .collect();
        if let Some(first) = urls.first().cloned() {
            urls.push(first);
        }

        for pool_size in [1usize, 2, 3, 16] {
            let mut config = test_config(urls.clone());
            config.thread_pool.pool_size = pool_size;

            let run = ThreadPoolRunner::new(&config).run(&urls, None).unwrap();
            assert_eq!(
                run.total(),
                urls.len(),
                "pool size {} with {} URLs",
                pool_size,
                urls.len()
            );

            let mut returned: Vec<&str> = run.outcomes.iter().map(|o| o.url()).collect();
            let mut expected: Vec<&str> = urls.iter().map(String::as_str).collect();
            returned.sort_unstable();
            expected.sort_unstable();
            assert_eq!(returned, expected);
        }
    }
}

#[test]
fn test_event_loop_one_outcome_per_url() {
    let site = MockSite::start();
    site.page("/p", "<title>P</title>");
    site.status("/missing", 404);

    for url_count in [0usize, 1, 9] {
        let urls: Vec<String> = (0..url_count)
            .map(|i| {
                if i % 4 == 3 {
                    site.url("/missing")
                } else {
                    site.url("/p")
                }
            })
            .collect();

        for concurrency in [0usize, 1, 3] {
            let mut config = test_config(urls.clone());
            config.event_loop.concurrency = concurrency;

            let run = EventLoopRunner::new(&config).run(&urls, None).unwrap();
            assert_eq!(run.total(), urls.len(), "concurrency {}", concurrency);
            assert_eq!(run.failed(), url_count / 4);
        }
    }
}

#[test]
fn test_sink_failure_does_not_reduce_parsed_records() {
    let site = scenario_site();
    let urls = vec![site.url("/ok"), site.url("/404"), site.url("/ok")];
    let config = test_config(urls.clone());

    for kind in StrategyKind::ALL {
        let runner = build_strategy(kind, &config);
        let without_sink = runner.run(&urls, None).unwrap();
        let with_failing_sink = runner.run(&urls, Some(Arc::new(RejectingSink))).unwrap();

        assert_eq!(without_sink.succeeded(), 2, "{}", kind);
        assert_eq!(with_failing_sink.succeeded(), without_sink.succeeded(), "{}", kind);
        assert_eq!(with_failing_sink.sink_failures, 2, "{}", kind);
        assert_eq!(without_sink.sink_failures, 0, "{}", kind);
    }
}

#[test]
fn test_panicking_task_is_isolated() {
    let site = MockSite::start();
    site.page("/one", "<title>One</title>");
    site.page("/boom", "<title>Boom</title>");
    site.page("/two", "<title>Two</title>");
    let urls = vec![site.url("/one"), site.url("/boom"), site.url("/two")];
    let config = test_config(urls.clone());

    for kind in [StrategyKind::ThreadPool, StrategyKind::EventLoop] {
        let run = build_strategy(kind, &config)
            .run(&urls, Some(Arc::new(PanickingSink { suffix: "/boom" })))
            .unwrap();

        assert_eq!(run.total(), urls.len(), "{}", kind);
        assert_eq!(run.succeeded(), 2, "{}", kind);
        assert!(run.outcome_for(&urls[0]).is_some_and(|o| o.is_parsed()), "{}", kind);
        assert!(run.outcome_for(&urls[2]).is_some_and(|o| o.is_parsed()), "{}", kind);
        assert_eq!(
            run.outcome_for(&urls[1]).and_then(|o| o.error()),
            Some(FetchErrorKind::TaskFailed),
            "{}",
            kind
        );
    }
}

#[test]
fn test_records_persisted_per_strategy() {
    let site = scenario_site();
    let urls = vec![site.url("/ok"), site.url("/404")];
    let config = test_config(urls.clone());
    let sink = Arc::new(SqliteSink::new_in_memory().unwrap());

    for kind in StrategyKind::ALL {
        build_strategy(kind, &config)
            .run(&urls, Some(sink.clone()))
            .unwrap();
    }

    assert_eq!(sink.count().unwrap(), 3);
    assert_eq!(
        sink.count_by_strategy().unwrap(),
        vec![
            ("event-loop".to_string(), 1),
            ("sequential".to_string(), 1),
            ("thread-pool".to_string(), 1)
        ]
    );

    let stored = sink.records_for(StrategyKind::EventLoop).unwrap();
    assert_eq!(stored[0].url, urls[0]);
    assert_eq!(stored[0].title, "A");
}

#[test]
fn test_event_loop_global_timeout_cancels_outstanding() {
    let site = MockSite::start();
    site.page("/fast", "<title>Fast</title>");
    site.slow_page("/slow", "<title>Slow</title>", SLOW_RESPONSE);

    let urls = vec![site.url("/fast"), site.url("/slow"), site.url("/slow")];
    let mut config = test_config(urls.clone());
    // Per-request timeout well past the global deadline
    config.http.timeout_seconds = 10.0;
    config.event_loop.global_timeout_seconds = Some(0.5);
    let sink = Arc::new(MemorySink::new());

    let start = Instant::now();
    let run = EventLoopRunner::new(&config)
        .run(&urls, Some(sink.clone()))
        .unwrap();
    let elapsed = start.elapsed();

    assert!(elapsed < SLOW_RESPONSE, "runner waited for slow pages: {:?}", elapsed);
    assert_eq!(run.total(), 3);
    assert!(run.outcome_for(&urls[0]).is_some_and(|o| o.is_parsed()));
    let timed_out = run
        .outcomes
        .iter()
        .filter(|o| o.error() == Some(FetchErrorKind::Timeout))
        .count();
    assert_eq!(timed_out, 2);

    // Cancelled tasks never reached the sink
    let stored = sink.records();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].1.title, "Fast");
}

#[test]
fn test_event_loop_overlaps_slow_requests() {
    let site = MockSite::start();
    let delay = Duration::from_millis(400);
    site.slow_page("/slow", "<title>Slow</title>", delay);

    let urls: Vec<String> = (0..5).map(|_| site.url("/slow")).collect();
    let mut config = test_config(urls.clone());
    config.http.timeout_seconds = 5.0;

    let start = Instant::now();
    let run = EventLoopRunner::new(&config).run(&urls, None).unwrap();
    let elapsed = start.elapsed();

    assert_eq!(run.succeeded(), 5);
    // Serialized fetches would need at least 5 * 400ms
    assert!(elapsed < delay * 5, "requests did not interleave: {:?}", elapsed);
}
