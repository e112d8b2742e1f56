//! CSV output for harvested quotes
//!
//! The file has a `text,author,tags` header followed by one row per quote.
//! Tags share a single column, joined with a configurable delimiter.

use crate::quote::{parse_tags_field, Quote, HEADER};
use crate::{HarvestError, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;

/// Writes quotes to a CSV file, replacing any existing file
///
/// # Arguments
///
/// * `path` - Destination file
/// * `quotes` - Quotes in output order
/// * `tag_delimiter` - Separator placed between tags in the tags column
///
/// # Returns
///
/// * `Ok(usize)` - Number of data rows written (header excluded)
/// * `Err(HarvestError)` - The file could not be created or written
pub fn write_quotes(path: &Path, quotes: &[Quote], tag_delimiter: &str) -> Result<usize> {
    let mut writer = WriterBuilder::new().from_path(path)?;

    writer.write_record(HEADER)?;
    for quote in quotes {
        writer.write_record([
            quote.text.as_str(),
            quote.author.as_str(),
            quote.tags_field(tag_delimiter).as_str(),
        ])?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} quotes to {}", quotes.len(), path.display());
    Ok(quotes.len())
}

/// Reads quotes back from a file produced by [`write_quotes`]
///
/// # Returns
///
/// * `Ok(Vec<Quote>)` - Quotes in file order
/// * `Err(HarvestError::Format)` - The header or a row has the wrong shape
pub fn read_quotes(path: &Path, tag_delimiter: &str) -> Result<Vec<Quote>> {
    // Row lengths are checked below so a bad row reports as a format error
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?;
    if headers.iter().ne(HEADER) {
        return Err(HarvestError::Format(format!(
            "expected header {:?}, found {:?}",
            HEADER,
            headers.iter().collect::<Vec<_>>()
        )));
    }

    let mut quotes = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        match (record.get(0), record.get(1), record.get(2)) {
            (Some(text), Some(author), Some(tags)) if record.len() == HEADER.len() => {
                quotes.push(Quote::new(text, author, parse_tags_field(tags, tag_delimiter)));
            }
            _ => {
                return Err(HarvestError::Format(format!(
                    "row {} has {} fields, expected {}",
                    row + 1,
                    record.len(),
                    HEADER.len()
                )))
            }
        }
    }

    Ok(quotes)
}
