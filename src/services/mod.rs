//! Service layer: aggregation, currency conversion, rates and notifications.
//!
//! Kept free of CLI concerns so the pipeline can be driven from tests.

pub mod aggregate;
pub mod convert;
pub mod exchange;
pub mod notify;

pub use aggregate::{is_single_word, relevance_filter, Aggregator, DEFAULT_TERM_PAUSE};
pub use convert::{convert, to_usd};
pub use exchange::{BcvRateSource, FixedRate, MonitorRateSource, RateError, RateSource};
pub use notify::{notify_quietly, summary_message, Notifier, NotifyError, TelegramNotifier};
