//! Official rate from the Banco Central de Venezuela home page.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{info, warn};

use super::{RateError, RateSource};
use crate::models::{ExchangeRate, RateSourceKind};
use crate::scrapers::extract::element_text;
use crate::scrapers::PageFetcher;

pub const BCV_URL: &str = "http://www.bcv.org.ve/";

const DOLLAR_SELECTOR: &str = "#dolar div.col-sm-6.col-xs-6.centrado";

/// Read the dollar rate out of the BCV home page.
///
/// The page writes the rate with `.` thousands separators and a `,` decimal
/// mark, e.g. `36,25740000`.
pub fn parse_bcv_rate(html: &Html) -> Result<f64, RateError> {
    let selector = Selector::parse(DOLLAR_SELECTOR).map_err(|_| RateError::MissingElement)?;
    let element = html.select(&selector).next().ok_or(RateError::MissingElement)?;
    let text = element_text(element);

    let numeral = text.trim().replace('.', "").replace(',', ".");
    numeral
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(RateError::Parse(text))
}

/// BCV home page scraper.
pub struct BcvRateSource {
    fetcher: Arc<dyn PageFetcher>,
    url: String,
}

impl BcvRateSource {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            url: BCV_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    async fn read(&self) -> Result<f64, RateError> {
        let doc = self.fetcher.fetch(&self.url).await?;
        let html = doc.parse();
        parse_bcv_rate(&html)
    }
}

#[async_trait]
impl RateSource for BcvRateSource {
    async fn get_rate(&self) -> ExchangeRate {
        match self.read().await {
            Ok(rate) => {
                info!("BCV rate: {}", rate);
                ExchangeRate::new(Some(rate), RateSourceKind::Bcv)
            }
            Err(e) => {
                warn!("Could not read the BCV rate: {}", e);
                ExchangeRate::unavailable(RateSourceKind::Bcv)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::{FetchError, StaticPages};

    const PAGE: &str = r#"<div id="euro"><div class="col-sm-6 col-xs-6 centrado"><strong> 39,10 </strong></div></div>
        <div id="dolar">
          <div class="col-sm-6 col-xs-6"><span> USD </span></div>
          <div class="col-sm-6 col-xs-6 centrado"><strong> 1.036,25740000 </strong></div>
        </div>"#;

    #[test]
    fn test_parse_bcv_rate() {
        let html = Html::parse_document(PAGE);
        assert_eq!(parse_bcv_rate(&html).unwrap(), 1036.2574);
    }

    #[test]
    fn test_parse_bcv_rate_missing_element() {
        let html = Html::parse_document("<div id='euro'></div>");
        assert!(matches!(parse_bcv_rate(&html), Err(RateError::MissingElement)));
    }

    #[tokio::test]
    async fn test_get_rate_from_page() {
        let pages = StaticPages::new().page(BCV_URL, PAGE);
        let source = BcvRateSource::new(Arc::new(pages));
        let reading = source.get_rate().await;
        assert_eq!(reading.rate, Some(1036.2574));
        assert_eq!(reading.source, RateSourceKind::Bcv);
    }

    #[tokio::test]
    async fn test_unreachable_gives_no_rate() {
        let pages = StaticPages::new().fail(BCV_URL, FetchError::Unreachable("down".into()));
        let reading = BcvRateSource::new(Arc::new(pages)).get_rate().await;
        assert_eq!(reading.rate, None);
    }
}
