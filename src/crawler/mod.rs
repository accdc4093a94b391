//! Crawler module for listing page fetching and processing
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching of listing pages
//! - Locating listing items in a page
//! - Concurrent per-item field extraction
//! - Overall run coordination

mod coordinator;
mod extractor;
mod fetcher;
mod parser;

pub use coordinator::{connect_scraper, RunSummary, Scraper};
pub use extractor::{
    extract_author, extract_edition_count, extract_record, extract_title, extract_year,
    parse_edition_label, parse_year_label, ExtractError,
};
pub use fetcher::{build_http_client, FetchError, PageFetcher, LISTING_PATH};
pub use parser::{locate_items, ItemFragment};
