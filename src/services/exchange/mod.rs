//! Bs./$ exchange-rate sources.
//!
//! Every source answers with an [`ExchangeRate`]; a source that can't be
//! read yields a reading with no rate rather than an error.

mod bcv;
mod monitor;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ExchangeRate, RateSourceKind};
use crate::scrapers::FetchError;

pub use bcv::{parse_bcv_rate, BcvRateSource, BCV_URL};
pub use monitor::{
    is_rate_post, parse_monitor_rate, MonitorRateSource, Post, DEFAULT_MONITOR_ACCOUNT,
};

/// Why a rate couldn't be read.
#[derive(Debug, Error)]
pub enum RateError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate element not found")]
    MissingElement,
    #[error("unparsable rate {0:?}")]
    Parse(String),
    #[error("no exchange-rate post found")]
    NoPost,
    #[error("bearer token not configured")]
    MissingToken,
}

/// Something that reports the current Bs./$ rate.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Current reading. Failures are reported as a reading with no rate.
    async fn get_rate(&self) -> ExchangeRate;
}

/// A rate supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub struct FixedRate(pub f64);

#[async_trait]
impl RateSource for FixedRate {
    async fn get_rate(&self) -> ExchangeRate {
        ExchangeRate::new(Some(self.0), RateSourceKind::Fixed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_rate() {
        let reading = FixedRate(36.5).get_rate().await;
        assert_eq!(reading.rate, Some(36.5));
        assert_eq!(reading.source, RateSourceKind::Fixed);
    }
}
