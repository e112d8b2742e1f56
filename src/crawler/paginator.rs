//! Pagination driver
//!
//! Walks listing pages 1, 2, 3, ... until the page source reports that the
//! listing is exhausted, accumulating the quotes of every page in order.

use crate::config::PaginationConfig;
use crate::crawler::fetcher::{EndReason, FetchResult};
use crate::crawler::parser::extract_quotes;
use crate::quote::Quote;
use crate::{HarvestError, Result};
use std::future::Future;

/// Anything that can produce listing pages by number
///
/// The HTTP implementation is [`HttpPageSource`](crate::crawler::HttpPageSource);
/// tests supply pages from memory.
pub trait PageSource {
    /// Fetches page `page` (1-based)
    ///
    /// Returns `FetchResult::Exhausted` once there are no more pages.
    /// An `Err` aborts the whole run.
    fn fetch_page(&mut self, page: u32) -> impl Future<Output = Result<FetchResult>>;
}

/// Everything collected by one pagination pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Harvest {
    /// Quotes from all pages, in page order then document order
    pub quotes: Vec<Quote>,

    /// Number of pages that yielded quotes
    pub pages_fetched: u32,

    /// What ended the pass
    pub end: EndReason,
}

/// Collects quotes from every page the source serves
///
/// The counter starts at 1 and increases by one after each page with quotes.
/// The first `Exhausted` result ends the pass. Without a page limit the loop
/// has no upper bound, so a source that never runs dry never returns.
///
/// # Arguments
///
/// * `source` - Where pages come from
/// * `limits` - Optional page limit
///
/// # Returns
///
/// * `Ok(Harvest)` - All quotes collected before the listing ran out
/// * `Err(HarvestError)` - A fetch failed or a page could not be extracted;
///   quotes gathered so far are discarded
pub async fn collect_quotes<S: PageSource>(
    source: &mut S,
    limits: &PaginationConfig,
) -> Result<Harvest> {
    let mut quotes = Vec::new();
    let mut page: u32 = 1;

    let end = loop {
        if let Some(max) = limits.max_pages {
            if page > max {
                tracing::info!("Stopping at page limit of {}", max);
                break EndReason::PageLimit(max);
            }
        }

        let document = match source.fetch_page(page).await? {
            FetchResult::Page(document) => document,
            FetchResult::Exhausted(reason) => {
                tracing::info!("Pagination ended at page {}: {}", page, reason);
                break reason;
            }
        };

        let extracted =
            extract_quotes(&document).map_err(|source| HarvestError::Extract { page, source })?;
        tracing::debug!("Page {}: {} quotes", page, extracted.len());
        quotes.extend(extracted);

        page += 1;
    };

    Ok(Harvest {
        quotes,
        pages_fetched: page - 1,
        end,
    })
}
