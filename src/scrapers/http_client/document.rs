//! Fetched page wrapper.

use scraper::Html;

/// A fetched HTML page.
///
/// Holds the raw markup rather than the parsed tree: `scraper::Html` is not
/// `Send`, so it is built on demand with [`Document::parse`] and must not be
/// kept across an `.await`.
#[derive(Debug, Clone)]
pub struct Document {
    url: String,
    body: String,
}

impl Document {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }

    /// URL the page was fetched from (used to resolve relative links).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Parse the body into a document tree.
    pub fn parse(&self) -> Html {
        Html::parse_document(&self.body)
    }
}
