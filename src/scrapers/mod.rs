//! Supermarket search scraping.
//!
//! - `http_client`: page fetching with typed failures
//! - `config`: per-store locators, price cleaners and pagination
//! - `extract`: generic listing extraction
//! - `paginate`: further result pages
//! - `pipeline`: one store, one term

pub mod config;
pub mod extract;
pub mod http_client;
pub mod normalize;
pub mod paginate;
pub mod pipeline;
pub mod static_pages;

pub use config::{Locator, Pagination, SiteConfig};
pub use extract::extract;
pub use http_client::{Document, FetchError, FetcherConfig, HttpClient, PageFetcher};
pub use paginate::paginate;
pub use pipeline::search_site;
pub use static_pages::StaticPages;
