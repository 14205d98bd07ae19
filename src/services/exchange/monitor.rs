//! Parallel-market rate from a monitor account's recent posts.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{RateError, RateSource};
use crate::models::{ExchangeRate, RateSourceKind};

pub const DEFAULT_MONITOR_ACCOUNT: &str = "monitordolarvla";

const RECENT_SEARCH_URL: &str = "https://api.twitter.com/2/tweets/search/recent";
const MAX_RESULTS: u32 = 10;

/// A post as returned by the recent-search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub text: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Post>,
}

/// Banknote marker, optional "Bs." and a decimal numeral.
static RATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"💵\s*Bs\.?\s*(\d+[,.]\d+)").unwrap());

/// True when a post carries the calendar and banknote markers of a rate
/// announcement.
pub fn is_rate_post(text: &str) -> bool {
    text.contains('🗓') && text.contains('💵')
}

/// Pull the rate out of an announcement, e.g. `"💵 Bs. 36,42"` → 36.42.
pub fn parse_monitor_rate(text: &str) -> Result<f64, RateError> {
    let caps = RATE_PATTERN
        .captures(text)
        .ok_or_else(|| RateError::Parse(text.to_string()))?;
    let numeral = caps[1].replace(',', ".");
    numeral
        .parse::<f64>()
        .map_err(|_| RateError::Parse(numeral))
}

/// Reads the latest rate announcement of a monitor account.
pub struct MonitorRateSource {
    client: reqwest::Client,
    account: String,
    bearer_token: Option<String>,
    endpoint: String,
}

impl MonitorRateSource {
    pub fn new(client: reqwest::Client, bearer_token: Option<String>) -> Self {
        Self {
            client,
            account: DEFAULT_MONITOR_ACCOUNT.to_string(),
            bearer_token,
            endpoint: RECENT_SEARCH_URL.to_string(),
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    async fn recent_posts(&self) -> Result<Vec<Post>, RateError> {
        let token = self.bearer_token.as_deref().ok_or(RateError::MissingToken)?;
        let query = format!("from:{}", self.account);
        let max_results = MAX_RESULTS.to_string();

        debug!("Fetching recent posts of {}", self.account);
        let response: SearchResponse = self
            .client
            .get(&self.endpoint)
            .bearer_auth(token)
            .query(&[
                ("query", query.as_str()),
                ("tweet.fields", "text,created_at"),
                ("max_results", max_results.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.data)
    }

    async fn read(&self) -> Result<f64, RateError> {
        let posts = self.recent_posts().await?;
        let post = posts
            .iter()
            .find(|p| is_rate_post(&p.text))
            .ok_or(RateError::NoPost)?;
        debug!("Rate post from {:?}: {}", post.created_at, post.text);
        parse_monitor_rate(&post.text)
    }
}

#[async_trait]
impl RateSource for MonitorRateSource {
    async fn get_rate(&self) -> ExchangeRate {
        match self.read().await {
            Ok(rate) => {
                info!("Monitor rate from {}: {}", self.account, rate);
                ExchangeRate::new(Some(rate), RateSourceKind::SocialMonitor)
            }
            Err(e) => {
                warn!("Could not read the monitor rate: {}", e);
                ExchangeRate::unavailable(RateSourceKind::SocialMonitor)
            }
        }
    }
}
