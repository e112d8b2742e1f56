//! Configuration module for Quote-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A run without a configuration file uses [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use quote_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Writing quotes to: {}", config.output.path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetchConfig, OutputConfig, PaginationConfig, SiteConfig, DEFAULT_BASE_URL,
    DEFAULT_OUTPUT_PATH,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
