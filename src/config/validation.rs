use crate::config::types::{Config, SourceConfig, StorageConfig};
use crate::storage::DatabaseUri;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// Must run after command-line and environment overrides are applied, since
/// the database URI usually arrives that way.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates the listing source
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if config.first_page < 1 {
        return Err(ConfigError::Validation(
            "first-page must be >= 1".to_string(),
        ));
    }

    if config.last_page < config.first_page {
        return Err(ConfigError::Validation(format!(
            "last-page ({}) must not be before first-page ({})",
            config.last_page, config.first_page
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates the document store settings
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    let uri = config.database_uri.as_deref().ok_or_else(|| {
        ConfigError::Validation(
            "database URI is required (set BOOKS_DATABASE_URI or --database-uri)".to_string(),
        )
    })?;

    DatabaseUri::parse(uri).map_err(|e| ConfigError::InvalidDatabaseUri(e.to_string()))?;

    if config.connect_timeout_secs == 0 || config.operation_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "storage timeouts must be > 0".to_string(),
        ));
    }

    Ok(())
}
