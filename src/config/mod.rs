//! Configuration module for Trending-Books
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and layering command-line/environment overrides on top.
//!
//! # Example
//!
//! ```no_run
//! use trending_books::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("books.toml")).unwrap();
//! println!("Scraping pages {}..={}", config.source.first_page, config.source.last_page);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BehaviorConfig, Config, FailurePolicy, SourceConfig, StorageConfig, DEFAULT_BASE_URL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
