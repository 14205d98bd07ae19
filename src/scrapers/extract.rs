//! Listing extraction and link resolution.

use scraper::{ElementRef, Html};
use tracing::debug;
use url::Url;

use super::config::SiteConfig;
use super::http_client::Document;
use super::normalize::clean_name;
use crate::models::ProductRow;

/// Resolve a possibly relative href against the page it was found on.
pub fn resolve_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    match Url::parse(base_url).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", base_url.trim_end_matches('/'), href),
    }
}

/// All descendant text of an element, concatenated.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Extract product rows from a fetched page.
pub fn extract(doc: &Document, site: &SiteConfig) -> Vec<ProductRow> {
    let html = doc.parse();
    let rows = extract_from_html(&html, site);
    debug!(
        "{}: {} products extracted from {}",
        site.store,
        rows.len(),
        doc.url()
    );
    rows
}

/// Extract product rows from a parsed page.
///
/// Listings missing a name or a price element are skipped.
pub fn extract_from_html(html: &Html, site: &SiteConfig) -> Vec<ProductRow> {
    let (Some(listing_sel), Some(name_sel), Some(price_sel)) = (
        site.listing.selector(),
        site.name.selector(),
        site.price.selector(),
    ) else {
        return Vec::new();
    };
    let availability_sel = site.availability.and_then(|l| l.selector());

    let mut rows = Vec::new();
    for (idx, listing) in html.select(&listing_sel).enumerate() {
        let name = listing.select(&name_sel).next();
        let price = listing.select(&price_sel).next();
        let (Some(name), Some(price)) = (name, price) else {
            debug!(
                "{}: listing {} lacks a name or price element, skipped",
                site.store, idx
            );
            continue;
        };

        let available = match (&site.availability, &availability_sel) {
            (None, _) => true,
            (Some(_), Some(sel)) => listing.select(sel).next().is_some(),
            (Some(_), None) => false,
        };

        rows.push(ProductRow::new(
            clean_name(&element_text(name)),
            (site.clean_price)(&element_text(price)),
            available,
        ));
    }
    rows
}
