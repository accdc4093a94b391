//! Trending-Books main entry point
//!
//! This is the command-line interface for the trending-list book scraper.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use trending_books::config::{load_config_with_hash, validate, Config, FailurePolicy};
use trending_books::crawler::{connect_scraper, PageFetcher};
use tracing_subscriber::EnvFilter;

/// Trending-Books: scrape the trending book listing into a document store
///
/// Fetches each listing page in the configured range, extracts title,
/// author, first-publication year and edition count for every book, and
/// stores one document per book with an increasing numeric id.
#[derive(Parser, Debug)]
#[command(name = "trending-books")]
#[command(version)]
#[command(about = "Scrape the trending book listing into a document store", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Database connection URI (sqlite://<path> or sqlite::memory:)
    #[arg(long, env = "BOOKS_DATABASE_URI", value_name = "URI")]
    database_uri: Option<String>,

    /// Catalogue base URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// First listing page to fetch
    #[arg(long)]
    first_page: Option<u32>,

    /// Last listing page to fetch
    #[arg(long)]
    last_page: Option<u32>,

    /// Skip items that fail to parse or write instead of aborting the run
    #[arg(long)]
    skip_bad_items: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show which pages would be fetched, then exit
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Layers command-line and environment values over the file config
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(uri) = &self.database_uri {
            config.storage.database_uri = Some(uri.clone());
        }
        if let Some(base_url) = &self.base_url {
            config.source.base_url = base_url.clone();
        }
        if let Some(first_page) = self.first_page {
            config.source.first_page = first_page;
        }
        if let Some(last_page) = self.last_page {
            config.source.last_page = last_page;
        }
        if self.skip_bad_items {
            config.behavior.on_item_error = FailurePolicy::Skip;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    handle_scrape(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("trending_books=info,warn"),
            1 => EnvFilter::new("trending_books=debug,info"),
            2 => EnvFilter::new("trending_books=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration and page URLs
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Trending-Books Dry Run ===\n");

    println!("Source:");
    println!("  Base URL: {}", config.source.base_url);
    println!(
        "  Pages: {}..={}",
        config.source.first_page, config.source.last_page
    );
    println!("  User agent: {}", config.source.user_agent);
    println!("  Request timeout: {}s", config.source.request_timeout_secs);

    println!("\nStorage:");
    println!(
        "  Database: {}",
        config.storage.database_uri.as_deref().unwrap_or("-")
    );
    println!(
        "  Timeouts: connect {}s, operation {}s",
        config.storage.connect_timeout_secs, config.storage.operation_timeout_secs
    );

    println!("\nOn item error: {:?}", config.behavior.on_item_error);

    let fetcher = PageFetcher::new(&config.source)?;
    println!("\nWould fetch:");
    for page in config.source.first_page..=config.source.last_page {
        println!("  {}", fetcher.page_url(page)?);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Scraping {} pages {}..={}",
        config.source.base_url,
        config.source.first_page,
        config.source.last_page
    );

    let scraper = match connect_scraper(&config).await {
        Ok(scraper) => scraper,
        Err(e) => {
            tracing::error!("Startup failed: {}", e);
            return Err(e.into());
        }
    };

    match scraper.run().await {
        Ok(summary) => {
            let total = scraper.store().count_books().await?;
            tracing::info!(
                "Scrape completed successfully: {} new books, {} in store",
                summary.records_written,
                total
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
