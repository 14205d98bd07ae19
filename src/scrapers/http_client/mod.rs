//! Page fetching over HTTP.
//!
//! Every failure is converted into a [`FetchError`] at this boundary. There
//! is a single attempt per URL; callers decide what an error means for them
//! (usually an empty result for that page).
//!
//! Pages go through a hyper client so the HTTP/1 header-count ceiling can be
//! raised; hyper rejects more than 100 headers unless told otherwise.

mod document;

pub use document::Document;

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use http_body_util::{BodyExt, Empty};
use hyper::body::{Bytes, Incoming};
use hyper::header::{ACCEPT, LOCATION, USER_AGENT as USER_AGENT_HEADER};
use hyper::{Request, Response, StatusCode, Uri};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client as LegacyClient;
use hyper_util::rt::TokioExecutor;
use thiserror::Error;
use tracing::debug;

use super::extract::resolve_url;

/// Default ceiling on response header count.
///
/// Some store sites send very verbose responses; the limit is generous but
/// still bounded.
pub const DEFAULT_MAX_RESPONSE_HEADERS: usize = 1000;

/// Redirects followed before giving up on a page.
const MAX_REDIRECTS: usize = 10;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";

/// Agent sent when none is configured.
pub const USER_AGENT: &str = "vfood/0.2 (supermarket price tracker)";

/// Desktop browser agent, selected with `user_agent = "browser"`. Some of
/// the store sites answer unknown agents with an empty catalogue.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Agent string for a configured value.
pub fn resolve_user_agent(config: Option<&str>) -> &str {
    match config.map(str::trim) {
        None | Some("") => USER_AGENT,
        Some("browser") => BROWSER_USER_AGENT,
        Some(custom) => custom,
    }
}

/// Error text with its source chain.
fn describe(e: &dyn StdError) -> String {
    let mut text = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}

/// Why a page could not be fetched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered that the resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server could not be reached (DNS, connect, timeout).
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// Anything else: unexpected status, unreadable body, header ceiling.
    #[error("fetch failed: {0}")]
    Other(String),
}

impl FetchError {
    fn from_client(url: &str, e: &hyper_util::client::legacy::Error) -> Self {
        if e.is_connect() {
            FetchError::Unreachable(format!("{}: {}", url, describe(e)))
        } else {
            FetchError::Other(format!("{}: {}", url, describe(e)))
        }
    }

    fn from_status(url: &str, status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND | StatusCode::GONE => FetchError::NotFound(url.to_string()),
            _ => FetchError::Other(format!("{}: HTTP {}", url, status)),
        }
    }
}

/// Something that turns a URL into a page.
///
/// Implemented by [`HttpClient`]; tests substitute canned responses.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Document, FetchError>;
}

/// Settings for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// None => default agent, "browser" => desktop browser agent, else custom.
    pub user_agent: Option<String>,
    /// Responses with more headers than this are rejected.
    pub max_response_headers: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: None,
            max_response_headers: DEFAULT_MAX_RESPONSE_HEADERS,
        }
    }
}

type PageClient = LegacyClient<HttpsConnector<HttpConnector>, Empty<Bytes>>;

/// HTTP page fetcher.
#[derive(Clone)]
pub struct HttpClient {
    pages: PageClient,
    api: reqwest::Client,
    user_agent: String,
    timeout: Duration,
    max_response_headers: usize,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let user_agent = resolve_user_agent(config.user_agent.as_deref()).to_string();

        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let pages = LegacyClient::builder(TokioExecutor::new())
            .http1_max_headers(config.max_response_headers)
            .build(connector);

        let api = reqwest::Client::builder()
            .user_agent(&user_agent)
            .timeout(config.timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            pages,
            api,
            user_agent,
            timeout: config.timeout,
            max_response_headers: config.max_response_headers,
        })
    }

    /// Client for JSON APIs (rate monitor, notifications).
    pub fn inner(&self) -> &reqwest::Client {
        &self.api
    }

    async fn send(&self, url: &str) -> Result<Response<Incoming>, FetchError> {
        let uri: Uri = url
            .parse()
            .map_err(|e| FetchError::Other(format!("{}: invalid URL: {}", url, e)))?;
        let request = Request::get(uri)
            .header(USER_AGENT_HEADER, self.user_agent.as_str())
            .header(ACCEPT, ACCEPT_HTML)
            .body(Empty::new())
            .map_err(|e| FetchError::Other(format!("{}: {}", url, e)))?;

        self.pages
            .request(request)
            .await
            .map_err(|e| FetchError::from_client(url, &e))
    }

    /// GET a page, following redirects. The returned document carries the
    /// final URL.
    async fn get_page(&self, url: &str) -> Result<Document, FetchError> {
        let mut current = url.to_string();

        for _ in 0..=MAX_REDIRECTS {
            let start = Instant::now();
            let response = self.send(&current).await?;

            let status = response.status();
            let header_count = response.headers().len();
            debug!(
                "GET {} -> {} ({} headers, {}ms)",
                current,
                status.as_u16(),
                header_count,
                start.elapsed().as_millis()
            );

            if header_count > self.max_response_headers {
                return Err(FetchError::Other(format!(
                    "{}: {} response headers exceeds limit of {}",
                    current, header_count, self.max_response_headers
                )));
            }

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| {
                        FetchError::Other(format!("{}: HTTP {} without Location", current, status))
                    })?;
                current = resolve_url(&current, location);
                continue;
            }
            if !status.is_success() {
                return Err(FetchError::from_status(&current, status));
            }

            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| FetchError::Other(format!("{}: {}", current, describe(&e))))?
                .to_bytes();
            let text = String::from_utf8_lossy(&body).into_owned();
            return Ok(Document::new(current, text));
        }

        Err(FetchError::Other(format!("{}: too many redirects", url)))
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        match tokio::time::timeout(self.timeout, self.get_page(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Unreachable(format!(
                "{}: timed out after {}s",
                url,
                self.timeout.as_secs()
            ))),
        }
    }
}
