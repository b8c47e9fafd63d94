//! Driver end-to-end: config file in, report and artifacts out

use crate::support::{scenario_site, test_config};
use crawl_bench::benchmark::{run_benchmark, Benchmark};
use crawl_bench::config::load_config_with_hash;
use crawl_bench::output::{format_report, write_artifacts};
use crawl_bench::storage::{MemorySink, RecordSink, SqliteSink};
use crawl_bench::StrategyKind;
use std::io::Write;
use std::sync::Arc;

#[test]
fn test_benchmark_with_repeats_and_sink() {
    let site = scenario_site();
    let urls = vec![site.url("/ok"), site.url("/404"), site.url("/timeout")];
    let mut config = test_config(urls);
    config.benchmark.repeats = 2;
    let sink = Arc::new(MemorySink::new());

    let report = Benchmark::new(config, Some(sink.clone())).run().unwrap();

    let order: Vec<StrategyKind> = report.results.iter().map(|r| r.strategy).collect();
    assert_eq!(order, StrategyKind::ALL.to_vec());
    for result in &report.results {
        assert_eq!(result.runs.len(), 2);
        assert_eq!(result.latest_counts(), (1, 3));
        assert!(result.min_seconds() <= result.mean_seconds());
        assert!(result.mean_seconds() <= result.max_seconds());
    }
    assert!(report.consistent());
    assert_eq!(report.ranking().len(), 3);

    // One record per strategy per repeat
    assert_eq!(sink.count().unwrap(), 6);

    let text = format_report(&report);
    assert!(text.contains("1/3 succeeded"));
}

#[test]
fn test_config_file_to_artifacts() {
    let site = scenario_site();
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("store").join("webpages.db");
    let plot_path = dir.path().join("results").join("benchmark_plot.svg");
    let raw_path = dir.path().join("results").join("raw_results.json");

    let toml = format!(
        r#"
urls = ["{ok}", "{missing}"]

[benchmark]
repeats = 1
strategies = ["event-loop", "sequential"]

[http]
timeout-seconds = 0.5
connect-timeout-seconds = 0.5

[sink]
enabled = true
db-uri = "sqlite://{db}"

[output]
plot-path = "{plot}"
raw-results-path = "{raw}"
"#,
        ok = site.url("/ok"),
        missing = site.url("/404"),
        db = db_path.display(),
        plot = plot_path.display(),
        raw = raw_path.display(),
    );
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(toml.as_bytes()).unwrap();
    file.flush().unwrap();

    let (config, hash) = load_config_with_hash(file.path()).unwrap();
    let report = run_benchmark(&config).unwrap();
    let report = crawl_bench::BenchmarkReport {
        config_hash: Some(hash.clone()),
        ..report
    };

    assert_eq!(
        report.results.iter().map(|r| r.strategy).collect::<Vec<_>>(),
        vec![StrategyKind::Sequential, StrategyKind::EventLoop]
    );

    write_artifacts(&report, &config.output).unwrap();

    let svg = std::fs::read_to_string(&plot_path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Event loop"));

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&raw_path).unwrap()).unwrap();
    assert_eq!(raw["config_hash"], hash.as_str());
    assert_eq!(raw["results"].as_array().map(Vec::len), Some(2));
    assert_eq!(raw["summary"][0]["succeeded"], 1);
    assert_eq!(raw["summary"][0]["total"], 2);

    let store = SqliteSink::new(&db_path).unwrap();
    assert_eq!(store.count().unwrap(), 2);
    assert_eq!(store.records_for(StrategyKind::Sequential).unwrap()[0].title, "A");
}

#[test]
fn test_empty_url_list_benchmark() {
    let report = run_benchmark(&test_config(Vec::new())).unwrap();

    assert_eq!(report.results.len(), 3);
    for result in &report.results {
        assert_eq!(result.latest_counts(), (0, 0));
        assert!(result.mean_seconds() < 1.0, "{} took {}s", result.strategy, result.mean_seconds());
    }
}
