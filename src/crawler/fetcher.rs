//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building the HTTP client with the configured user agent
//! - Building listing page URLs
//! - GET requests for listing pages, accepting only HTTP 200

use crate::config::SourceConfig;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Path of the trending listing, relative to the catalogue base URL
pub const LISTING_PATH: &str = "trending/daily";

/// Errors raised while fetching a listing page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The listing source configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &SourceConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches listing pages from one catalogue
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    base_url: Url,
}

impl PageFetcher {
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let mut base_url = Url::parse(&config.base_url)?;
        // Joining replaces the last path segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = build_http_client(config).map_err(FetchError::Client)?;
        Ok(Self { client, base_url })
    }

    /// URL of listing page `page`, e.g. `https://openlibrary.org/trending/daily?page=2`
    pub fn page_url(&self, page: u32) -> Result<Url, FetchError> {
        let mut url = self.base_url.join(LISTING_PATH)?;
        url.query_pairs_mut()
            .clear()
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    /// Fetches one listing page and returns its HTML body
    ///
    /// Only HTTP 200 counts as success. There is no retry: any other status
    /// or a transport failure is returned as-is.
    pub async fn fetch_page(&self, page: u32) -> Result<String, FetchError> {
        let url = self.page_url(page)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}
