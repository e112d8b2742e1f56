//! Crawler module for listing page fetching and extraction
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with retry logic
//! - Quote extraction from listing pages
//! - The pagination loop that ties them together

mod fetcher;
mod paginator;
mod parser;

pub use fetcher::{build_http_client, page_url, EndReason, FetchResult, HttpPageSource, RetryPolicy};
pub use paginator::{collect_quotes, Harvest, PageSource};
pub use parser::{count_quotes, extract_quotes, parse_document};

use crate::config::Config;
use crate::output::write_quotes;
use crate::HarvestError;
use std::path::Path;

/// Outcome of a complete harvest run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Pages that yielded quotes
    pub pages_fetched: u32,

    /// Data rows written to the output file
    pub quotes_written: usize,

    /// What ended pagination
    pub end: EndReason,
}

/// Runs a complete harvest operation
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP client
/// 2. Fetch and extract pages until the listing runs out
/// 3. Write every collected quote to the output file
///
/// Nothing is written unless pagination finishes cleanly, so a failure
/// midway leaves no partial output behind.
///
/// # Arguments
///
/// * `config` - The harvester configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - Harvest completed and the file was written
/// * `Err(HarvestError)` - Harvest failed
///
/// # Example
///
/// ```no_run
/// use quote_harvest::config::Config;
/// use quote_harvest::crawler::run_harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_harvest(&Config::default()).await?;
/// println!("{} quotes written", summary.quotes_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: &Config) -> Result<RunSummary, HarvestError> {
    let mut source = HttpPageSource::from_config(&config.site.base_url, &config.fetch)?;

    tracing::info!("Harvesting quotes from {}", config.site.base_url);
    let start_time = std::time::Instant::now();

    let harvest = collect_quotes(&mut source, &config.pagination).await?;

    tracing::info!(
        "Collected {} quotes from {} pages in {:?}",
        harvest.quotes.len(),
        harvest.pages_fetched,
        start_time.elapsed()
    );

    let quotes_written = write_quotes(
        Path::new(&config.output.path),
        &harvest.quotes,
        &config.output.tag_delimiter,
    )?;

    Ok(RunSummary {
        pages_fetched: harvest.pages_fetched,
        quotes_written,
        end: harvest.end,
    })
}
