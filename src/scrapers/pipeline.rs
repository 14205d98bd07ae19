//! One store, one search term: fetch, extract, paginate.

use tracing::info;

use super::config::SiteConfig;
use super::http_client::{FetchError, PageFetcher};
use super::paginate::paginate;
use crate::models::ProductRow;

/// Search one store for `term` and collect every listing found.
///
/// Fails only if the first result page can't be fetched; failures on later
/// pages are absorbed by [`paginate`].
pub async fn search_site(
    fetcher: &dyn PageFetcher,
    site: &SiteConfig,
    term: &str,
) -> Result<Vec<ProductRow>, FetchError> {
    let url = site.search_url(term);
    info!("Searching {:?} in {} ({})", term, site.store, url);

    let first = fetcher.fetch(&url).await?;
    let rows = paginate(fetcher, site, &first).await;

    info!("{}: {} products for {:?}", site.store, rows.len(), term);
    Ok(rows)
}
