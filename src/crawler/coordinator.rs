//! Scrape coordinator - main orchestration logic
//!
//! This module drives a whole run:
//! - Fetching each listing page in the configured range, in order
//! - Locating the items on every page
//! - Extracting and writing one record per item, one item at a time
//! - Applying the failure policy to item-level errors

use crate::config::{validate, Config, FailurePolicy};
use crate::crawler::extractor::extract_record;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::{locate_items, ItemFragment};
use crate::storage::{self, BookStore, SqliteStorage, StoreHandle};
use crate::{ConfigError, ScrapeError};
use std::time::{Duration, Instant};

/// Totals for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Listing pages fetched successfully
    pub pages_fetched: u32,

    /// Items located across all fetched pages
    pub items_seen: usize,

    /// Records written to the store
    pub records_written: usize,

    /// Items dropped under [`FailurePolicy::Skip`]
    pub items_skipped: usize,
}

/// Main scrape coordinator structure
pub struct Scraper<S> {
    fetcher: PageFetcher,
    store: StoreHandle<S>,
    first_page: u32,
    last_page: u32,
    policy: FailurePolicy,
}

impl<S: BookStore + Send + 'static> Scraper<S> {
    /// Creates a new scraper over an already connected store
    pub fn new(config: &Config, store: StoreHandle<S>) -> Result<Self, ScrapeError> {
        Ok(Self {
            fetcher: PageFetcher::new(&config.source)?,
            store,
            first_page: config.source.first_page,
            last_page: config.source.last_page,
            policy: config.behavior.on_item_error,
        })
    }

    pub fn store(&self) -> &StoreHandle<S> {
        &self.store
    }

    /// Runs the main scrape loop
    ///
    /// A failed page fetch ends the run immediately; later pages are never
    /// requested. Item errors end the run too unless the policy is
    /// [`FailurePolicy::Skip`].
    pub async fn run(&self) -> Result<RunSummary, ScrapeError> {
        let mut summary = RunSummary::default();
        let start_time = Instant::now();

        for page in self.first_page..=self.last_page {
            let body = match self.fetcher.fetch_page(page).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::error!("Failed to fetch page {}: {}", page, e);
                    return Err(e.into());
                }
            };
            summary.pages_fetched += 1;

            let items = locate_items(&body);
            tracing::info!("Page {}: {} items", page, items.len());

            for (index, item) in items.iter().enumerate() {
                summary.items_seen += 1;

                match self.process_item(item).await {
                    Ok(id) => {
                        summary.records_written += 1;
                        tracing::debug!("Page {} item {}: stored book {}", page, index + 1, id);
                    }
                    Err(e) => match self.policy {
                        FailurePolicy::Abort => {
                            tracing::error!("Page {} item {}: {}", page, index + 1, e);
                            return Err(e);
                        }
                        FailurePolicy::Skip => {
                            tracing::warn!("Page {} item {} skipped: {}", page, index + 1, e);
                            summary.items_skipped += 1;
                        }
                    },
                }
            }
        }

        tracing::info!(
            "Scrape completed: {} pages, {} books written, {} skipped in {:?}",
            summary.pages_fetched,
            summary.records_written,
            summary.items_skipped,
            start_time.elapsed()
        );

        Ok(summary)
    }

    /// Extracts one item and writes it; returns the stored id
    ///
    /// Must finish before the next item starts, since the id is only
    /// claimed by the write.
    async fn process_item(&self, item: &ItemFragment) -> Result<i64, ScrapeError> {
        let record = extract_record(item, &self.store).await?;
        let id = record.id;

        self.store
            .write(record)
            .await
            .map_err(|source| ScrapeError::Write { id, source })?;

        Ok(id)
    }
}

/// Validates the configuration, connects to the store and builds a scraper
///
/// A store that cannot be reached within the connect deadline is fatal.
///
/// # Example
///
/// ```no_run
/// use trending_books::config::Config;
/// use trending_books::crawler::connect_scraper;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = Config::default();
/// config.storage.database_uri = Some("sqlite://books.db".to_string());
/// let summary = connect_scraper(&config).await?.run().await?;
/// println!("{} books stored", summary.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn connect_scraper(config: &Config) -> Result<Scraper<SqliteStorage>, ScrapeError> {
    validate(config)?;

    let uri = config
        .storage
        .database_uri
        .as_deref()
        .ok_or_else(|| ConfigError::Validation("database URI is required".to_string()))?;

    let store = storage::connect(
        uri,
        Duration::from_secs(config.storage.connect_timeout_secs),
        Duration::from_secs(config.storage.operation_timeout_secs),
    )
    .await
    .map_err(ScrapeError::Connection)?;

    tracing::info!("Connected to document store");

    Scraper::new(config, store)
}
