//! In-memory page fetcher.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::http_client::{Document, FetchError, PageFetcher};

/// Serves canned pages keyed by exact URL.
///
/// Unknown URLs answer [`FetchError::NotFound`]; URLs registered with
/// [`StaticPages::fail`] answer the given error. Every requested URL is
/// recorded, in order.
#[derive(Default)]
pub struct StaticPages {
    pages: HashMap<String, Result<String, FetchError>>,
    requested: Mutex<Vec<String>>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), Ok(body.into()));
        self
    }

    /// Answer `url` with `error`.
    pub fn fail(mut self, url: impl Into<String>, error: FetchError) -> Self {
        self.pages.insert(url.into(), Err(error));
        self
    }

    /// URLs requested so far.
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PageFetcher for StaticPages {
    async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(url.to_string());
        }
        match self.pages.get(url) {
            Some(Ok(body)) => Ok(Document::new(url, body.clone())),
            Some(Err(e)) => Err(e.clone()),
            None => Err(FetchError::NotFound(url.to_string())),
        }
    }
}
