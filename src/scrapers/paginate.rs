//! Multi-page search results.

use std::collections::HashSet;

use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use super::config::{Locator, Pagination, SiteConfig};
use super::extract::{element_text, extract, extract_from_html, resolve_url};
use super::http_client::{Document, PageFetcher};
use crate::models::ProductRow;

/// Most result pages read for one store and term, counting the first.
pub const MAX_PAGES: u32 = 50;

/// URLs of result pages linked from a `LinkList` container, resolved against
/// `page_url`. Only the first container on the page is used.
pub fn link_list_urls(html: &Html, page_url: &str, container: &Locator) -> Vec<String> {
    let Some(container_sel) = container.selector() else {
        return Vec::new();
    };
    let Ok(anchor_sel) = Selector::parse("a") else {
        return Vec::new();
    };
    let Some(list) = html.select(&container_sel).next() else {
        return Vec::new();
    };

    list.select(&anchor_sel)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| resolve_url(page_url, href))
        .collect()
}

/// URLs for pages 2..N of a `NumberedPages` result set.
///
/// Returns nothing when there are fewer than two page links or the page
/// count can't be read. At most [`MAX_PAGES`] pages are read in total.
pub fn numbered_page_urls(
    html: &Html,
    link: &Locator,
    page_segment: &str,
    page_template: &str,
) -> Vec<String> {
    let Some(link_sel) = link.selector() else {
        return Vec::new();
    };
    let links: Vec<_> = html.select(&link_sel).collect();
    if links.len() < 2 {
        return Vec::new();
    }

    let count_text = element_text(links[links.len() - 2]);
    let Ok(page_count) = count_text.trim().parse::<u32>() else {
        debug!("Unreadable page count {:?}", count_text.trim());
        return Vec::new();
    };
    let Some(first_href) = links[0].value().attr("href") else {
        return Vec::new();
    };
    if page_count > MAX_PAGES {
        warn!(
            "Page count {} exceeds limit, reading the first {} pages",
            page_count, MAX_PAGES
        );
    }

    (2..=page_count.min(MAX_PAGES))
        .map(|n| first_href.replace(page_segment, &page_template.replace("{n}", &n.to_string())))
        .collect()
}

/// First-page rows plus the URLs of the other result pages.
fn scan_first_page(first: &Document, site: &SiteConfig) -> (Vec<ProductRow>, Vec<String>) {
    let html = first.parse();
    let rows = extract_from_html(&html, site);
    let urls = match site.pagination {
        Pagination::Single => Vec::new(),
        Pagination::LinkList { container } => {
            let mut visited: HashSet<String> = HashSet::new();
            visited.insert(first.url().to_string());
            link_list_urls(&html, first.url(), &container)
                .into_iter()
                .filter(|url| visited.insert(url.clone()))
                .collect()
        }
        Pagination::NumberedPages {
            link,
            page_segment,
            page_template,
        } => numbered_page_urls(&html, &link, page_segment, page_template),
    };
    (rows, urls)
}

/// Collect rows from the first page and every further result page.
///
/// Pages are fetched one after another. A page that fails to load is
/// logged and contributes no rows; the remaining pages are still tried.
pub async fn paginate(
    fetcher: &dyn PageFetcher,
    site: &SiteConfig,
    first: &Document,
) -> Vec<ProductRow> {
    let (mut rows, page_urls) = scan_first_page(first, site);

    if !page_urls.is_empty() {
        info!(
            "{}: {} more result pages for {}",
            site.store,
            page_urls.len(),
            first.url()
        );
    }

    for (idx, url) in page_urls.iter().enumerate() {
        debug!("{}: trying page {} ({})", site.store, idx + 2, url);
        match fetcher.fetch(url).await {
            Ok(doc) => rows.extend(extract(&doc, site)),
            Err(e) => warn!("{}: result page skipped: {}", site.store, e),
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Store;

    #[test]
    fn test_link_list_urls_resolves_hrefs() {
        let html = Html::parse_document(
            r#"<ul class="pagination">
                 <li><a href="/search/?text=pan&page=0">1</a></li>
                 <li><a href="/search/?text=pan&page=1">2</a></li>
               </ul>
               <ul class="pagination"><li><a href="/ignored">x</a></li></ul>"#,
        );
        let urls = link_list_urls(
            &html,
            "https://gamaenlinea.com/search/?text=pan",
            &Locator::new("ul", "pagination"),
        );
        assert_eq!(
            urls,
            vec![
                "https://gamaenlinea.com/search/?text=pan&page=0",
                "https://gamaenlinea.com/search/?text=pan&page=1",
            ]
        );
    }

    #[test]
    fn test_numbered_page_urls() {
        let html = Html::parse_document(
            r#"<nav>
                 <a class="page-numbers" href="https://tc.example/page/2/?s=pan">2</a>
                 <a class="page-numbers" href="https://tc.example/page/3/?s=pan">3</a>
                 <a class="page-numbers" href="https://tc.example/page/4/?s=pan">4</a>
                 <a class="next page-numbers" href="https://tc.example/page/2/?s=pan">→</a>
               </nav>"#,
        );
        let urls = numbered_page_urls(
            &html,
            &Locator::new("a", "page-numbers"),
            "page/2/",
            "page/{n}/",
        );
        assert_eq!(
            urls,
            vec![
                "https://tc.example/page/2/?s=pan",
                "https://tc.example/page/3/?s=pan",
                "https://tc.example/page/4/?s=pan",
            ]
        );
    }

    #[test]
    fn test_numbered_page_urls_capped() {
        let html = Html::parse_document(
            r#"<a class="page-numbers" href="https://tc.example/page/2/?s=pan">2</a>
               <a class="page-numbers" href="https://tc.example/page/99999/?s=pan">99999</a>
               <a class="next page-numbers" href="https://tc.example/page/2/?s=pan">→</a>"#,
        );
        let urls = numbered_page_urls(&html, &Locator::new("a", "page-numbers"), "page/2/", "page/{n}/");
        assert_eq!(urls.len(), (MAX_PAGES - 1) as usize);
        assert_eq!(
            urls.last().map(String::as_str),
            Some(format!("https://tc.example/page/{}/?s=pan", MAX_PAGES).as_str())
        );
    }

    #[test]
    fn test_numbered_page_urls_unreadable_count() {
        let html = Html::parse_document(
            r#"<a class="page-numbers" href="/page/2/">next</a>
               <a class="page-numbers" href="/page/2/">→</a>"#,
        );
        let urls = numbered_page_urls(&html, &Locator::new("a", "page-numbers"), "page/2/", "page/{n}/");
        assert!(urls.is_empty());
    }

    #[test]
    fn test_scan_first_page_skips_visited_url() {
        let site = SiteConfig::for_store(Store::Gama);
        let first = Document::new(
            "https://gamaenlinea.com/search/?text=pan",
            r#"<ul class="pagination">
                 <li><a href="/search/?text=pan">1</a></li>
                 <li><a href="/search/?text=pan&page=1">2</a></li>
                 <li><a href="/search/?text=pan&page=1">»</a></li>
               </ul>"#,
        );
        let (rows, urls) = scan_first_page(&first, &site);
        assert!(rows.is_empty());
        assert_eq!(urls, vec!["https://gamaenlinea.com/search/?text=pan&page=1"]);
    }

    #[test]
    fn test_single_page_sites_have_no_more_pages() {
        let site = SiteConfig::for_store(Store::Plazas);
        let first = Document::new(
            "https://www.elplazas.com/Products.php?des=pan",
            r#"<ul class="pagination"><li><a href="/p2">2</a></li></ul>"#,
        );
        let (_, urls) = scan_first_page(&first, &site);
        assert!(urls.is_empty());
    }
}
