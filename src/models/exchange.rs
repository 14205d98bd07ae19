//! Exchange rate snapshot.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Unit the rate is expressed in.
pub const RATE_UNIT: &str = "Bs./$";

/// Where an exchange rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSourceKind {
    /// Banco Central de Venezuela home page.
    Bcv,
    /// Exchange-rate posts from a social media monitor account.
    SocialMonitor,
    /// Supplied by the caller.
    Fixed,
}

impl RateSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bcv => "bcv",
            Self::SocialMonitor => "monitor",
            Self::Fixed => "fixed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bcv" => Some(Self::Bcv),
            "monitor" | "social_monitor" => Some(Self::SocialMonitor),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }

    /// Label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bcv => "BCV",
            Self::SocialMonitor => "Monitor",
            Self::Fixed => "manual",
        }
    }
}

/// A Bs./$ rate reading. `rate` is `None` when the source could not be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub timestamp: DateTime<Local>,
    pub rate: Option<f64>,
    pub source: RateSourceKind,
}

impl ExchangeRate {
    pub fn new(rate: Option<f64>, source: RateSourceKind) -> Self {
        Self {
            timestamp: Local::now(),
            rate,
            source,
        }
    }

    /// A failed reading from `source`.
    pub fn unavailable(source: RateSourceKind) -> Self {
        Self::new(None, source)
    }

    /// The rate, if present and usable as a divisor.
    pub fn usable(&self) -> Option<f64> {
        self.rate.filter(|r| r.is_finite() && *r > 0.0)
    }
}

impl std::fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.rate {
            Some(rate) => write!(f, "{} {} ({})", rate, RATE_UNIT, self.source.label()),
            None => write!(f, "unavailable ({})", self.source.label()),
        }
    }
}
