//! Product listing rows, from raw extraction to USD-priced output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for the `date` column (day/month/year).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Supported supermarket sites.
///
/// Serialized as the display name, which is what the `store_name` column holds.
/// Deserialization also accepts the snake_case id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Store {
    Plazas,
    Gama,
    CentralMadeirense,
    PlanSuarez,
}

impl Store {
    /// All stores, in the order a search visits them.
    pub const ALL: [Store; 4] = [
        Store::Plazas,
        Store::Gama,
        Store::CentralMadeirense,
        Store::PlanSuarez,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plazas => "plazas",
            Self::Gama => "gama",
            Self::CentralMadeirense => "central_madeirense",
            Self::PlanSuarez => "plan_suarez",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "plazas" => Some(Self::Plazas),
            "gama" => Some(Self::Gama),
            "central_madeirense" => Some(Self::CentralMadeirense),
            "plan_suarez" => Some(Self::PlanSuarez),
            _ => None,
        }
    }

    /// Human-readable store name, as written to the `store` column.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Plazas => "Plazas",
            Self::Gama => "Gama",
            Self::CentralMadeirense => "Central Madeirense",
            Self::PlanSuarez => "Plan Suarez",
        }
    }
}

impl Serialize for Store {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.display_name())
    }
}

impl<'de> Deserialize<'de> for Store {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Store::ALL
            .into_iter()
            .find(|store| store.display_name() == s)
            .or_else(|| Store::from_str(&s))
            .ok_or_else(|| serde::de::Error::custom(format!("unknown store: {}", s)))
    }
}

impl std::fmt::Display for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single listing pulled from a search result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    /// Product name, trimmed.
    pub product_name: String,
    /// Canonical price text: `"<symbol> <numeral>"`.
    pub product_price: String,
    /// Whether the store shows the product as purchasable.
    pub product_availability: bool,
}

impl ProductRow {
    pub fn new(product_name: String, product_price: String, product_availability: bool) -> Self {
        Self {
            product_name,
            product_price,
            product_availability,
        }
    }

    /// Tag this row with the run date, originating store and search term.
    pub fn annotate(self, date: NaiveDate, store: Store, search_term: &str) -> AnnotatedRow {
        AnnotatedRow {
            product: self,
            date,
            store,
            search_term: search_term.to_string(),
        }
    }
}

/// A product row tagged with when, where and for what it was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRow {
    #[serde(flatten)]
    pub product: ProductRow,
    #[serde(with = "day_month_year")]
    pub date: NaiveDate,
    pub store: Store,
    pub search_term: String,
}

impl AnnotatedRow {
    pub fn product_name(&self) -> &str {
        &self.product.product_name
    }

    pub fn product_price(&self) -> &str {
        &self.product.product_price
    }

    /// Date rendered as day/month/year.
    pub fn date_label(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Attach the converted USD price.
    pub fn with_usd(self, product_price_dollar: Option<f64>) -> PricedRow {
        PricedRow {
            row: self,
            product_price_dollar,
        }
    }
}

/// Terminal row handed to the price store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedRow {
    #[serde(flatten)]
    pub row: AnnotatedRow,
    /// Price in US dollars; `None` when the price text could not be converted.
    pub product_price_dollar: Option<f64>,
}

impl PricedRow {
    pub fn store(&self) -> Store {
        self.row.store
    }

    pub fn search_term(&self) -> &str {
        &self.row.search_term
    }
}

mod day_month_year {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(d)?;
        NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}
