use serde::Deserialize;

/// Default catalogue serving the trending listing
pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Main configuration structure for Trending-Books
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// Where and how listing pages are fetched
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SourceConfig {
    /// Scheme and host of the catalogue (e.g. "https://openlibrary.org")
    pub base_url: String,

    /// First listing page to fetch (inclusive)
    pub first_page: u32,

    /// Last listing page to fetch (inclusive)
    pub last_page: u32,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Whole-request timeout for page fetches (seconds)
    pub request_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            first_page: 1,
            last_page: 5,
            user_agent: format!("trending-books/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 30,
        }
    }
}

/// Document store settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Connection URI (`sqlite://<path>` or `sqlite::memory:`)
    pub database_uri: Option<String>,

    /// Deadline for opening and verifying the connection (seconds)
    pub connect_timeout_secs: u64,

    /// Deadline for each id lookup and each insert (seconds)
    pub operation_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_uri: None,
            connect_timeout_secs: 10,
            operation_timeout_secs: 3,
        }
    }
}

/// Run behavior
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BehaviorConfig {
    /// What to do when a single item fails to extract or write
    pub on_item_error: FailurePolicy,
}

/// Reaction to an item-level failure (parse, id allocation, write)
///
/// Connection and fetch failures always end the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop the whole run at the first bad item
    #[default]
    Abort,
    /// Log the item, count it as skipped and move on
    Skip,
}
