//! HTML extraction of quote records
//!
//! Each listing page holds a series of `.quote` containers. Every container
//! carries one `.text` element, one `.author` element, and zero or more
//! `.tag` elements.

use crate::quote::Quote;
use crate::ExtractError;
use scraper::{ElementRef, Html, Selector};

const QUOTE_SELECTOR: &str = ".quote";
const TEXT_SELECTOR: &str = ".text";
const AUTHOR_SELECTOR: &str = ".author";
const TAG_SELECTOR: &str = ".tag";

/// Compiled selectors for one extraction pass
struct QuoteSelectors {
    quote: Selector,
    text: Selector,
    author: Selector,
    tag: Selector,
}

impl QuoteSelectors {
    fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            quote: compile(QUOTE_SELECTOR)?,
            text: compile(TEXT_SELECTOR)?,
            author: compile(AUTHOR_SELECTOR)?,
            tag: compile(TAG_SELECTOR)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector(format!("{}: {}", selector, e)))
}

/// Parses a response body into a document
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Returns the number of quote containers in the document
pub fn count_quotes(document: &Html) -> Result<usize, ExtractError> {
    let selector = compile(QUOTE_SELECTOR)?;
    Ok(document.select(&selector).count())
}

/// Extracts every quote on the page
///
/// Quotes come back in document order, and so do the tags within each quote.
/// Text and author are taken verbatim, without trimming.
///
/// # Arguments
///
/// * `document` - A parsed listing page
///
/// # Returns
///
/// * `Ok(Vec<Quote>)` - One record per quote container
/// * `Err(ExtractError::MissingField)` - A container lacks its text or author
///
/// # Example
///
/// ```
/// use quote_harvest::crawler::{extract_quotes, parse_document};
///
/// let html = r#"<div class="quote"><span class="text">Hi</span>
///     <small class="author">Ann</small><a class="tag">greeting</a></div>"#;
/// let quotes = extract_quotes(&parse_document(html)).unwrap();
/// assert_eq!(quotes[0].author, "Ann");
/// assert_eq!(quotes[0].tags, vec!["greeting"]);
/// ```
pub fn extract_quotes(document: &Html) -> Result<Vec<Quote>, ExtractError> {
    let selectors = QuoteSelectors::new()?;

    document
        .select(&selectors.quote)
        .enumerate()
        .map(|(index, container)| extract_quote(container, index, &selectors))
        .collect()
}

fn extract_quote(
    container: ElementRef<'_>,
    index: usize,
    selectors: &QuoteSelectors,
) -> Result<Quote, ExtractError> {
    let text = first_text(container, &selectors.text).ok_or(ExtractError::MissingField {
        index,
        field: "text",
    })?;

    let author = first_text(container, &selectors.author).ok_or(ExtractError::MissingField {
        index,
        field: "author",
    })?;

    let tags = container
        .select(&selectors.tag)
        .map(|tag| tag.text().collect::<String>())
        .collect();

    Ok(Quote { text, author, tags })
}

/// Text content of the first descendant matching `selector`
fn first_text(container: ElementRef<'_>, selector: &Selector) -> Option<String> {
    container
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>())
}
