//! Ripple-Count main entry point
//!
//! This is the command-line interface for the Ripple-Count word crawler.

use anyhow::Context;
use clap::Parser;
use ripple_count::clock::SystemClock;
use ripple_count::config::{load_config, Config};
use ripple_count::crawler::{worker_count, HttpPageParser, PageParserCapability, ParallelCrawler};
use ripple_count::output::{write_result, write_result_to_path, PopularWords, WordCountSelectorCapability};
use ripple_count::profiler::Profiler;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Ripple-Count: a parallel word-frequency crawler
///
/// Ripple-Count crawls outward from a set of start pages, bounded by link
/// depth and a time limit, and reports the most popular words it found
/// together with how long parsing took.
#[derive(Parser, Debug)]
#[command(name = "ripple-count")]
#[command(version = "1.0.0")]
#[command(about = "A parallel word-frequency crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!("Configuration loaded successfully");

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that results written to stdout stay parseable.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_count=info,warn"),
            1 => EnvFilter::new("ripple_count=debug,info"),
            2 => EnvFilter::new("ripple_count=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    let crawler = &config.crawler;

    println!("=== Ripple-Count Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", crawler.max_depth);
    println!(
        "  Parallelism: {} requested, {} usable",
        crawler.parallelism,
        worker_count(crawler.parallelism)
    );
    println!("  Timeout: {}s", crawler.timeout_seconds);
    println!("  Popular word count: {}", crawler.popular_word_count);
    println!("  On parse error: {:?}", crawler.on_parse_error);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!(
        "  Result: {}",
        config.output.result_path.as_deref().unwrap_or("<stdout>")
    );
    println!(
        "  Profile: {}",
        config
            .output
            .profile_output_path
            .as_deref()
            .unwrap_or("<stdout>")
    );

    println!("\nStart Pages ({}):", crawler.start_pages.len());
    for page in &crawler.start_pages {
        println!("  - {}", page);
    }

    println!("\nIgnored URL Patterns ({}):", crawler.ignored_urls.len());
    for pattern in &crawler.ignored_urls {
        println!("  - {}", pattern);
    }

    println!("\nIgnored Word Patterns ({}):", crawler.ignored_words.len());
    for pattern in &crawler.ignored_words {
        println!("  - {}", pattern);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let clock = Arc::new(SystemClock);
    let profiler = Profiler::new(clock.clone());

    let parser = HttpPageParser::new(&config).context("Failed to create page parser")?;
    let parser = profiler.wrap::<PageParserCapability, _>(parser)?;
    let selector = profiler.wrap::<WordCountSelectorCapability, _>(PopularWords)?;

    let crawler = ParallelCrawler::with_selector(&config.crawler, parser, selector, clock)?;
    tracing::info!("Using {} workers", crawler.worker_count());

    let result = match crawler.crawl(&config.crawler.start_pages).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    match &config.output.result_path {
        Some(path) => write_result_to_path(&result, Path::new(path))
            .with_context(|| format!("Failed to write result to {}", path))?,
        None => write_result(&result, &mut std::io::stdout().lock())?,
    }

    match &config.output.profile_output_path {
        Some(path) => profiler
            .write_data_to_path(Path::new(path))
            .with_context(|| format!("Failed to write profile data to {}", path))?,
        None => profiler.write_data(&mut std::io::stdout().lock())?,
    }

    Ok(())
}
