//! Data models for vfood.

mod exchange;
mod product;
mod table;

pub use exchange::{ExchangeRate, RateSourceKind, RATE_UNIT};
pub use product::{AnnotatedRow, PricedRow, ProductRow, Store, DATE_FORMAT};
pub use table::{ShapeError, Table, Tabular, PRICED_COLUMNS, RAW_COLUMNS};
