//! Quote-Harvest: a paginated quote scraper
//!
//! This crate walks the numbered listing pages of a quotes site, extracts the
//! quote text, author and tags from every quote container, and writes the
//! collected records to a CSV file.

pub mod config;
pub mod crawler;
pub mod output;
pub mod quote;

use thiserror::Error;

/// Main error type for Quote-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Extraction failed on page {page}: {source}")]
    Extract { page: u32, source: ExtractError },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected output format: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while pulling quotes out of a parsed page
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("quote #{index} has no '{field}' element")]
    MissingField { index: usize, field: &'static str },

    #[error("invalid selector: {0}")]
    Selector(String),
}

/// Result type alias for Quote-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    collect_quotes, run_harvest, EndReason, FetchResult, Harvest, PageSource, RunSummary,
};
pub use quote::Quote;
