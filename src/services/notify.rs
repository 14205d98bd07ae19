//! Run summaries sent to a chat.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{info, warn};

const TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("telegram credentials not configured")]
    MissingCredentials,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Build the summary for a run.
///
/// ```text
/// At 2024-03-15 13:05 these foods were scraped:
/// • arroz
/// • leche en polvo
/// ```
///
/// Extras, when given, follow under an "Extra information" heading.
pub fn summary_message<T, E>(terms: &[T], extras: &[E], now: DateTime<Local>) -> String
where
    T: AsRef<str>,
    E: AsRef<str>,
{
    let mut message = format!(
        "At {} these foods were scraped:",
        now.format("%Y-%m-%d %H:%M")
    );
    for term in terms {
        message.push_str("\n• ");
        message.push_str(term.as_ref());
    }

    if !extras.is_empty() {
        message.push_str("\n\n Extra information");
        for extra in extras {
            message.push_str("\n• ");
            message.push_str(extra.as_ref());
        }
    }
    message
}

/// Delivers a plain-text message.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<(), NotifyError>;
}

/// Telegram Bot API `sendMessage`.
pub struct TelegramNotifier {
    client: reqwest::Client,
    token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramNotifier {
    pub fn new(client: reqwest::Client, token: Option<String>, chat_id: Option<String>) -> Self {
        Self {
            client,
            token,
            chat_id,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.chat_id.is_some()
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let (Some(token), Some(chat_id)) = (self.token.as_deref(), self.chat_id.as_deref()) else {
            return Err(NotifyError::MissingCredentials);
        };

        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API, token);
        self.client
            .get(&url)
            .query(&[("chat_id", chat_id), ("text", message)])
            .send()
            .await?
            .error_for_status()?;

        info!("Summary sent to chat {}", chat_id);
        Ok(())
    }
}

/// Send and log; a failed notification never stops a run.
pub async fn notify_quietly(notifier: &dyn Notifier, message: &str) -> bool {
    match notifier.send(message).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Error trying to send notification: {}", e);
            false
        }
    }
}
