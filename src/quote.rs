//! The quote record produced by extraction and consumed by the CSV writer

/// Column names of the output file, in field declaration order
pub const HEADER: [&str; 3] = ["text", "author", "tags"];

/// A single quote scraped from a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// The quote text, exactly as it appears on the page
    pub text: String,

    /// The author's name
    pub author: String,

    /// Tag labels in document order (may be empty)
    pub tags: Vec<String>,
}

impl Quote {
    /// Creates a new quote record
    pub fn new(text: impl Into<String>, author: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            tags,
        }
    }

    /// Renders the tags as a single field joined by `delimiter`
    pub fn tags_field(&self, delimiter: &str) -> String {
        self.tags.join(delimiter)
    }
}

/// Splits a tags field written by [`Quote::tags_field`]
///
/// An empty field yields no tags rather than one empty tag, so a quote whose
/// only tag is empty reads back with no tags.
pub fn parse_tags_field(field: &str, delimiter: &str) -> Vec<String> {
    if field.is_empty() {
        return Vec::new();
    }
    field.split(delimiter).map(str::to_string).collect()
}
