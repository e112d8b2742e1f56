//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - Building page URLs from the base URL
//! - Retrying transport failures with exponential backoff
//! - Deciding when the listing has run out of pages

use crate::config::FetchConfig;
use crate::crawler::paginator::PageSource;
use crate::crawler::parser::{count_quotes, parse_document};
use crate::{HarvestError, Result};
use reqwest::Client;
use scraper::Html;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Why pagination stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The server answered with a non-success status
    HttpStatus(u16),

    /// The page loaded but held no quote containers
    NoQuotes,

    /// The configured page limit was reached
    PageLimit(u32),
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::HttpStatus(code) => write!(f, "HTTP {}", code),
            EndReason::NoQuotes => write!(f, "page has no quotes"),
            EndReason::PageLimit(n) => write!(f, "page limit of {} reached", n),
        }
    }
}

/// Result of fetching one listing page
#[derive(Debug)]
pub enum FetchResult {
    /// The page exists and holds at least one quote
    Page(Html),

    /// No more pages
    Exhausted(EndReason),
}

/// How transport failures are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry
    pub backoff_base: Duration,
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff_base: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (1-based): `base * 2^(retry - 1)`
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.backoff_base.saturating_mul(1u32 << exponent)
    }
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_base: config.backoff_base(),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetchConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the URL of listing page `page`
///
/// The page path is appended to the base, so a base without a trailing
/// slash is treated as a directory rather than having its last segment
/// replaced.
///
/// # Example
///
/// ```
/// use quote_harvest::crawler::page_url;
/// use url::Url;
///
/// let base = Url::parse("https://quotes.toscrape.com/").unwrap();
/// assert_eq!(page_url(&base, 3).unwrap().as_str(), "https://quotes.toscrape.com/page/3");
/// ```
pub fn page_url(base: &Url, page: u32) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(&format!("page/{}", page))?)
}

/// Fetches listing pages over HTTP
pub struct HttpPageSource {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl HttpPageSource {
    /// Creates a page source for the given base URL
    pub fn new(client: Client, base_url: Url, retry: RetryPolicy) -> Self {
        Self {
            client,
            base_url,
            retry,
        }
    }

    /// Builds the client and parses the base URL from configuration
    pub fn from_config(base_url: &str, config: &FetchConfig) -> Result<Self> {
        let client = build_http_client(config)?;
        let base_url = Url::parse(base_url)?;
        Ok(Self::new(client, base_url, RetryPolicy::from(config)))
    }

    /// Fetches a URL, returning its status code and body
    ///
    /// Transport failures are retried per the policy; the last one is
    /// returned once retries run out. Any HTTP status, success or not,
    /// counts as a completed request.
    async fn get_with_retry(&self, url: &Url) -> Result<(u16, String)> {
        let mut retry = 0;

        loop {
            match self.get_once(url).await {
                Ok(response) => return Ok(response),
                Err(e) if retry < self.retry.max_retries && is_transient(&e) => {
                    retry += 1;
                    let delay = self.retry.delay_for(retry);
                    tracing::warn!(
                        "Request to {} failed ({}), retry {}/{} in {:?}",
                        url,
                        e,
                        retry,
                        self.retry.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    return Err(HarvestError::Http {
                        url: url.to_string(),
                        source: e,
                    })
                }
            }
        }
    }

    async fn get_once(&self, url: &Url) -> std::result::Result<(u16, String), reqwest::Error> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Ok((status.as_u16(), String::new()));
        }
        let body = response.text().await?;
        Ok((status.as_u16(), body))
    }
}

impl PageSource for HttpPageSource {
    async fn fetch_page(&mut self, page: u32) -> Result<FetchResult> {
        let url = page_url(&self.base_url, page)?;
        tracing::debug!("Fetching {}", url);

        let (status, body) = self.get_with_retry(&url).await?;

        if !(200..300).contains(&status) {
            tracing::debug!("Page {} returned HTTP {}", page, status);
            return Ok(FetchResult::Exhausted(EndReason::HttpStatus(status)));
        }

        let document = parse_document(&body);
        let found = count_quotes(&document).map_err(|source| HarvestError::Extract { page, source })?;
        if found == 0 {
            tracing::debug!("Page {} has no quotes", page);
            return Ok(FetchResult::Exhausted(EndReason::NoQuotes));
        }

        Ok(FetchResult::Page(document))
    }
}

/// Whether a transport error is worth another attempt
fn is_transient(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request() || error.is_body()
}
