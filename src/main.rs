//! crawl-bench main entry point
//!
//! This is the command-line interface for the crawler concurrency benchmark.

use anyhow::Context;
use clap::Parser;
use crawl_bench::benchmark::Benchmark;
use crawl_bench::config::{resolve_config, Config};
use crawl_bench::output::{load_statistics, print_report, print_statistics, write_artifacts};
use crawl_bench::storage::open_sink;
use crawl_bench::strategy::StrategyKind;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// crawl-bench: compare crawler concurrency strategies
///
/// Fetches the same URL list sequentially, with a thread pool, and on a
/// single-threaded event loop, then reports how long each took.
#[derive(Parser, Debug)]
#[command(name = "crawl-bench")]
#[command(version)]
#[command(about = "Benchmark sequential, thread-pool and event-loop crawling", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults to ./crawl-bench.toml if present)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Only run these strategies (repeatable)
    #[arg(short, long = "strategy", value_name = "NAME")]
    strategies: Vec<StrategyKind>,

    /// Times to run each strategy
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    repeats: Option<u32>,

    /// Validate config and show what would run without fetching anything
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show record counts from the document store and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) =
        resolve_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(hash) = &config_hash {
        tracing::info!("Configuration loaded successfully (hash: {})", hash);
    }

    if !cli.strategies.is_empty() {
        config.benchmark.strategies = cli.strategies.clone();
    }
    if let Some(repeats) = cli.repeats {
        config.benchmark.repeats = repeats;
    }

    if cli.dry_run {
        handle_dry_run(&config);
        Ok(())
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_benchmark(config, config_hash)
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawl_bench=info,warn"),
            1 => EnvFilter::new("crawl_bench=debug,info"),
            2 => EnvFilter::new("crawl_bench=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `--dry-run`: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== crawl-bench Dry Run ===\n");

    println!("Benchmark:");
    let strategies: Vec<&str> = StrategyKind::ALL
        .iter()
        .filter(|kind| config.benchmark.strategies.contains(kind))
        .map(|kind| kind.as_str())
        .collect();
    println!("  Strategies: {}", strategies.join(", "));
    println!("  Repeats: {}", config.benchmark.repeats);

    println!("\nHTTP:");
    println!("  Timeout: {}s", config.http.timeout_seconds);
    println!("  Connect timeout: {}s", config.http.connect_timeout_seconds);
    println!("  User agent: {}", config.http.user_agent);

    println!("\nCrawl:");
    println!("  Snippet chars: {}", config.crawl.snippet_chars);
    if config.crawl.follow_links {
        println!("  Following links, up to {} pages", config.crawl.max_pages);
    } else {
        println!("  Seed URLs only");
    }

    println!("\nThread pool:");
    println!("  Pool size: {}", config.thread_pool.pool_size);

    println!("\nEvent loop:");
    if config.event_loop.concurrency == 0 {
        println!("  Concurrency: unlimited");
    } else {
        println!("  Concurrency: {}", config.event_loop.concurrency);
    }
    match config.event_loop.global_timeout_seconds {
        Some(seconds) => println!("  Global timeout: {}s", seconds),
        None => println!("  Global timeout: none"),
    }

    println!("\nSink:");
    match (&config.sink.db_uri, config.sink.enabled) {
        (Some(uri), true) => {
            println!("  Database: {}", uri);
            println!("  Clear on start: {}", config.sink.clear_on_start);
        }
        _ => println!("  Disabled"),
    }

    println!("\nOutput:");
    println!("  Plot: {}", config.output.plot_path.display());
    println!("  Raw results: {}", config.output.raw_results_path.display());

    println!("\nURLs ({}):", config.urls.len());
    for url in &config.urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles `--stats`: record counts from the document store
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let sink = open_sink(&config.sink)
        .context("Failed to open document store")?
        .context("No document store configured (set sink.db-uri or CRAWL_BENCH_DB_URI)")?;

    let stats = load_statistics(sink.as_ref()).context("Failed to read document store")?;
    print_statistics(&stats);
    Ok(())
}

/// Runs the benchmark and writes the report, raw results and chart
fn handle_benchmark(config: Config, config_hash: Option<String>) -> anyhow::Result<()> {
    let sink = open_sink(&config.sink).context("Failed to open document store")?;

    let benchmark = Benchmark::new(config.clone(), sink).with_config_hash(config_hash);
    println!("Running benchmarks, please wait...");
    let report = benchmark.run().context("Benchmark failed")?;

    print_report(&report);

    write_artifacts(&report, &config.output).context("Failed to write results")?;
    println!(
        "\nDone! See:\n  {}\n  {}",
        config.output.raw_results_path.display(),
        config.output.plot_path.display()
    );

    Ok(())
}
