//! Per-store site configuration.
//!
//! All four stores share one extraction pipeline; what differs between them
//! is captured here: where to search, which elements hold a listing and its
//! fields, how prices are written, and how results are paginated.

use scraper::Selector;
use tracing::warn;

use super::normalize::{
    clean_central_price, clean_gama_price, clean_plan_suarez_price, clean_plazas_price,
    PriceCleaner,
};
use crate::models::Store;

/// Placeholder for the encoded search term in a URL template.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// An element locator: tag name plus the classes it must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    pub tag: &'static str,
    /// Space-separated class list, as written in the `class` attribute.
    pub class: &'static str,
}

impl Locator {
    pub const fn new(tag: &'static str, class: &'static str) -> Self {
        Self { tag, class }
    }

    /// CSS selector matching this locator.
    pub fn css(&self) -> String {
        let mut css = self.tag.to_string();
        for class in self.class.split_whitespace() {
            css.push('.');
            css.push_str(class);
        }
        css
    }

    /// Compile the selector. Logs and returns None if the locator is malformed.
    pub fn selector(&self) -> Option<Selector> {
        let css = self.css();
        let selector = match Selector::parse(&css) {
            Ok(selector) => Some(selector),
            Err(e) => {
                warn!("Invalid locator {:?}: {}", css, e);
                None
            }
        };
        selector
    }
}

/// How a store spreads search results over pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// Everything is on the first page.
    Single,
    /// Links to the other result pages sit inside `container`.
    LinkList { container: Locator },
    /// Numbered page links; the page count is the second-to-last link's
    /// text, and page URLs are built by replacing `page_segment` in the
    /// first link's href with `page_template` (`{n}` = page number).
    NumberedPages {
        link: Locator,
        page_segment: &'static str,
        page_template: &'static str,
    },
}

/// Everything needed to search one store.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub store: Store,
    /// Search URL template containing [`QUERY_PLACEHOLDER`].
    pub search_url: String,
    /// Joins the words of a multi-word search term in the URL.
    pub query_separator: &'static str,
    pub listing: Locator,
    pub name: Locator,
    pub price: Locator,
    /// When set, a listing is available only if this element is present.
    pub availability: Option<Locator>,
    pub clean_price: PriceCleaner,
    pub pagination: Pagination,
}

impl SiteConfig {
    /// Built-in configuration for a store.
    pub fn for_store(store: Store) -> Self {
        match store {
            Store::Gama => Self {
                store,
                search_url: "https://gamaenlinea.com/search/?text={query}".to_string(),
                query_separator: "+",
                listing: Locator::new("li", "product__list--item"),
                name: Locator::new("a", "product__list--name"),
                price: Locator::new("div", "from-price-value"),
                availability: Some(Locator::new(
                    "button",
                    "btn btn-primary btn-block glyphicon glyphicon-shopping-cart js-enable-btn ec-add-cart-btn",
                )),
                clean_price: clean_gama_price,
                pagination: Pagination::LinkList {
                    container: Locator::new("ul", "pagination"),
                },
            },
            Store::CentralMadeirense => Self {
                store,
                search_url: "https://tucentralonline.com/La-Lagunita-44/?count=40&paged=&post_type=product\
                    &s={query}&asp_active=1&p_asid=1&p_asp_data=1&current_page_id=143&woo_currency=BSD\
                    &qtranslate_lang=0&filters_changed=0&filters_initial=1&asp_gen%5B%5D=title\
                    &asp_gen%5B%5D=content&asp_gen%5B%5D=excerpt&customset%5B%5D=product\
                    &customset%5B%5D=postt"
                    .to_string(),
                query_separator: "+",
                listing: Locator::new("div", "product-inner"),
                name: Locator::new("div", "description"),
                price: Locator::new("span", "price"),
                availability: None,
                clean_price: clean_central_price,
                pagination: Pagination::NumberedPages {
                    link: Locator::new("a", "page-numbers"),
                    page_segment: "page/2/",
                    page_template: "page/{n}/",
                },
            },
            Store::Plazas => Self {
                store,
                search_url: "https://www.elplazas.com/Products.php?des={query}".to_string(),
                query_separator: "%20",
                listing: Locator::new("div", "Product"),
                name: Locator::new("div", "Description"),
                price: Locator::new("div", "Price"),
                availability: None,
                clean_price: clean_plazas_price,
                pagination: Pagination::Single,
            },
            Store::PlanSuarez => Self {
                store,
                search_url:
                    "https://www.plansuarez.com/index.php?route=product/search&search={query}&limit=100"
                        .to_string(),
                query_separator: "%20",
                listing: Locator::new("div", "product-thumb"),
                name: Locator::new("div", "name"),
                price: Locator::new("span", "price-normal"),
                availability: None,
                clean_price: clean_plan_suarez_price,
                pagination: Pagination::Single,
            },
        }
    }

    /// Built-in configurations for every store, in search order.
    pub fn all() -> Vec<Self> {
        Store::ALL.iter().map(|s| Self::for_store(*s)).collect()
    }

    /// Replace the search URL template.
    pub fn with_search_url(mut self, template: impl Into<String>) -> Self {
        self.search_url = template.into();
        self
    }

    /// Build the search URL for a term.
    ///
    /// Words are percent-encoded and joined with the store's separator.
    pub fn search_url(&self, term: &str) -> String {
        let query = term
            .split_whitespace()
            .map(|word| urlencoding::encode(word).into_owned())
            .collect::<Vec<_>>()
            .join(self.query_separator);
        self.search_url.replace(QUERY_PLACEHOLDER, &query)
    }
}
