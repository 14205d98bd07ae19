//! Multi-store, multi-term search.
//!
//! Terms are processed one after another; for each term the four stores are
//! searched in order. A store whose first result page fails contributes no
//! rows for that term and the remaining stores still run.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::models::{AnnotatedRow, ShapeError, Table};
use crate::scrapers::{search_site, PageFetcher, SiteConfig};

/// Default pause between consecutive search terms.
pub const DEFAULT_TERM_PAUSE: Duration = Duration::from_secs(3);

/// True when the term is a single word.
pub fn is_single_word(term: &str) -> bool {
    !term.trim().chars().any(char::is_whitespace)
}

/// Drop rows of single-word terms whose product name doesn't mention the
/// term (case-insensitive). Rows of multi-word terms are left alone.
pub fn relevance_filter(table: &mut Table<AnnotatedRow>) {
    let single_words: BTreeSet<String> = table
        .iter()
        .map(|r| r.search_term.clone())
        .filter(|t| is_single_word(t))
        .collect();

    for term in single_words {
        let needle = term.trim().to_lowercase();
        let before = table.len();
        table.retain(|r| {
            r.search_term != term || r.product_name().to_lowercase().contains(&needle)
        });
        let dropped = before - table.len();
        if dropped > 0 {
            info!("Dropped {} rows not matching {:?}", dropped, term);
        }
    }
}

/// Runs every store's pipeline for a list of terms.
pub struct Aggregator<'a> {
    fetcher: &'a dyn PageFetcher,
    sites: Vec<SiteConfig>,
    pause: Duration,
    date: Option<NaiveDate>,
}

impl<'a> Aggregator<'a> {
    /// Aggregator over all built-in stores.
    pub fn new(fetcher: &'a dyn PageFetcher) -> Self {
        Self {
            fetcher,
            sites: SiteConfig::all(),
            pause: DEFAULT_TERM_PAUSE,
            date: None,
        }
    }

    /// Use a specific set of store configurations.
    pub fn with_sites(mut self, sites: Vec<SiteConfig>) -> Self {
        self.sites = sites;
        self
    }

    /// Pause between consecutive terms.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Tag rows with this date instead of today's.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Search every store for one term and tag the results.
    ///
    /// `term` should already be trimmed; the lowercased form is what gets
    /// sent to the stores, the term itself is what rows are tagged with.
    pub async fn search_term(&self, term: &str, date: NaiveDate) -> Vec<AnnotatedRow> {
        let query = term.to_lowercase();
        let mut rows = Vec::new();

        for site in &self.sites {
            match search_site(self.fetcher, site, &query).await {
                Ok(found) => rows.extend(
                    found
                        .into_iter()
                        .map(|p| p.annotate(date, site.store, term)),
                ),
                Err(e) => warn!("{}: no results for {:?}: {}", site.store, term, e),
            }
        }

        rows
    }

    /// Search every store for every term.
    ///
    /// Returns the relevance-filtered table. An empty table means nothing
    /// was found, not that something failed.
    pub async fn search<S: AsRef<str>>(
        &self,
        terms: &[S],
    ) -> Result<Table<AnnotatedRow>, ShapeError> {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let mut table = Table::new();
        let mut searched = 0usize;

        for term in terms {
            let term = term.as_ref().trim();
            if term.is_empty() {
                continue;
            }
            if searched > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
            searched += 1;

            table.extend(self.search_term(term, date).await);
            table.check_shape()?;
        }

        relevance_filter(&mut table);
        table.check_shape()?;

        if table.is_empty() {
            info!("No data was found for the list of products");
        } else {
            info!("{} rows collected for {} terms", table.len(), searched);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductRow, Store};

    fn row(name: &str, term: &str) -> AnnotatedRow {
        ProductRow::new(name.into(), "$ 1.00".into(), true).annotate(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Store::Gama,
            term,
        )
    }

    #[test]
    fn test_is_single_word() {
        assert!(is_single_word("pan"));
        assert!(is_single_word(" pan "));
        assert!(!is_single_word("leche en polvo"));
        assert!(!is_single_word("leche\tpolvo"));
    }

    #[test]
    fn test_filter_single_word_term() {
        let mut table = Table::from_rows(vec![row("Pan integral", "pan"), row("Shampoo", "pan")]);
        relevance_filter(&mut table);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].product_name(), "Pan integral");
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let mut table = Table::from_rows(vec![row("HARINA PAN", "Pan"), row("Arroz", "Pan")]);
        relevance_filter(&mut table);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].product_name(), "HARINA PAN");
    }

    #[test]
    fn test_multi_word_terms_never_filtered() {
        let mut table = Table::from_rows(vec![
            row("Shampoo", "leche en polvo"),
            row("Leche completa", "leche en polvo"),
            row("Detergente", "pan"),
        ]);
        relevance_filter(&mut table);
        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|r| r.search_term == "leche en polvo"));
    }
}
