//! Wiki-Trawler main entry point
//!
//! This is the command-line interface for the Wiki-Trawler article crawler.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wiki_trawler::config::{compute_config_hash, parse_config, validate, Config};
use wiki_trawler::crawler::crawl;
use wiki_trawler::output::{load_index_statistics, print_report, print_statistics};
use wiki_trawler::seed_url;

/// Wiki-Trawler: a polite wiki article crawler
///
/// Wiki-Trawler crawls a single wiki host breadth-first from a start topic,
/// saving the text of each article and an index of every URL it attempted,
/// while pacing and capping its requests to the host.
#[derive(Parser, Debug)]
#[command(name = "wiki-trawler")]
#[command(version)]
#[command(about = "A polite, bounded breadth-first wiki crawler", long_about = None)]
struct Cli {
    /// Start topic, e.g. "Machine learning"
    #[arg(long)]
    topic: Option<String>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory (default: <topic>_wiki_articles)
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Max pages to save (default: 30)
    #[arg(long)]
    limit: Option<u32>,

    /// Max crawl depth (default: 1)
    #[arg(long)]
    depth: Option<u32>,

    /// Concurrent workers (default: 4)
    #[arg(long)]
    workers: Option<u32>,

    /// Max simultaneous HTTP requests (default: same as workers)
    #[arg(long)]
    max_parallel: Option<u32>,

    /// Base delay between requests in seconds (default: 1.0)
    #[arg(long)]
    delay: Option<f64>,

    /// Random jitter added to the delay in seconds (default: 0.5)
    #[arg(long)]
    jitter: Option<f64>,

    /// HTTP timeout in seconds (default: 15)
    #[arg(long)]
    timeout: Option<f64>,

    /// Attempts per URL on transient errors (default: 3)
    #[arg(long)]
    retries: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from an existing index file and exit
    #[arg(long, value_name = "INDEX_CSV", conflicts_with = "dry_run")]
    stats: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(index_path) = &cli.stats {
        return handle_stats(index_path);
    }

    let config = build_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wiki_trawler=info,warn"),
            1 => EnvFilter::new("wiki_trawler=debug,info"),
            2 => EnvFilter::new("wiki_trawler=trace,debug"),
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

/// Loads the optional config file, applies command-line overrides, and validates
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config = parse_config(&content)?;
            let hash = compute_config_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, cli);

    if config.start_topic.is_empty() {
        bail!("No start topic given; pass --topic or set start-topic in the config file");
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(topic) = &cli.topic {
        config.start_topic = topic.trim().to_string();
    }
    if let Some(out) = &cli.out {
        config.output.directory = Some(out.clone());
    }
    if let Some(limit) = cli.limit {
        config.crawler.page_limit = limit;
    }
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(max_parallel) = cli.max_parallel {
        config.crawler.max_parallel_requests = Some(max_parallel);
    }
    if let Some(delay) = cli.delay {
        config.politeness.base_delay_seconds = delay;
    }
    if let Some(jitter) = cli.jitter {
        config.politeness.jitter_seconds = jitter;
    }
    if let Some(timeout) = cli.timeout {
        config.politeness.request_timeout_seconds = timeout;
    }
    if let Some(retries) = cli.retries {
        config.politeness.max_retries = retries;
    }
}

/// Handles the --dry-run mode: shows the resolved configuration and seed URL
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let seed = seed_url(
        &config.site.base_url,
        &config.site.article_prefix,
        &config.start_topic,
    )?;

    println!("=== Wiki-Trawler Dry Run ===\n");

    println!("Start:");
    println!("  Topic: {}", config.start_topic);
    println!("  Seed URL: {}", seed);

    println!("\nCrawler Configuration:");
    println!("  Page limit: {}", config.crawler.page_limit);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Workers: {}", config.crawler.workers);
    println!(
        "  Parallel requests: {}",
        config.crawler.parallel_requests()
    );

    println!("\nPoliteness:");
    println!("  Base delay: {}s", config.politeness.base_delay_seconds);
    println!("  Jitter: {}s", config.politeness.jitter_seconds);
    println!(
        "  Request timeout: {}s",
        config.politeness.request_timeout_seconds
    );
    println!("  Attempts per URL: {}", config.politeness.max_retries);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Articles: {}", config.output_directory().display());
    println!("  Index: {}", config.index_path().display());

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows statistics from an index file
fn handle_stats(index_path: &Path) -> anyhow::Result<()> {
    println!("Index: {}\n", index_path.display());

    let stats = load_index_statistics(index_path)
        .with_context(|| format!("Failed to read index {}", index_path.display()))?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Starting crawl from: {}", config.start_topic);
    tracing::info!(
        "limit={}, depth={}, workers={}, out_dir={}",
        config.crawler.page_limit,
        config.crawler.max_depth,
        config.crawler.workers,
        config.output_directory().display()
    );

    match crawl(config).await {
        Ok(report) => {
            print_report(&report);
            println!("\nDone. Saved {} page(s).", report.saved);
            println!("Index: {}", report.index_path.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
