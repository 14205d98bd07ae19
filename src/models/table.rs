//! Fixed-schema tables of product rows.
//!
//! A table knows its column list and can verify that every row renders
//! exactly one cell per column. The aggregator checks the shape after each
//! step that builds or changes a table.

use thiserror::Error;

use super::product::{AnnotatedRow, PricedRow};

/// Columns of a scraped, annotated table.
pub const RAW_COLUMNS: [&str; 6] = [
    "product_name",
    "product_price",
    "product_availability",
    "date",
    "store",
    "search_term",
];

/// Columns of a table after USD conversion.
pub const PRICED_COLUMNS: [&str; 7] = [
    "product_name",
    "product_price",
    "product_availability",
    "date",
    "store",
    "search_term",
    "product_price_dollar",
];

/// A row type with a fixed column layout.
pub trait Tabular {
    /// Column names, in output order.
    const COLUMNS: &'static [&'static str];

    /// Render the row as one text cell per column.
    fn cells(&self) -> Vec<String>;
}

impl Tabular for AnnotatedRow {
    const COLUMNS: &'static [&'static str] = &RAW_COLUMNS;

    fn cells(&self) -> Vec<String> {
        vec![
            self.product.product_name.clone(),
            self.product.product_price.clone(),
            self.product.product_availability.to_string(),
            self.date_label(),
            self.store.display_name().to_string(),
            self.search_term.clone(),
        ]
    }
}

impl Tabular for PricedRow {
    const COLUMNS: &'static [&'static str] = &PRICED_COLUMNS;

    fn cells(&self) -> Vec<String> {
        let mut cells = self.row.cells();
        cells.push(
            self.product_price_dollar
                .map(|p| format!("{:.2}", p))
                .unwrap_or_default(),
        );
        cells
    }
}

/// A row/column mismatch found by [`Table::check_shape`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("row {row} has {found} cells, table has {expected} columns")]
pub struct ShapeError {
    pub row: usize,
    pub found: usize,
    pub expected: usize,
}

/// Ordered rows sharing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R: Tabular> Table<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<R>) -> Self {
        Self { rows }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        R::COLUMNS.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn extend<I: IntoIterator<Item = R>>(&mut self, rows: I) {
        self.rows.extend(rows);
    }

    pub fn retain<F: FnMut(&R) -> bool>(&mut self, f: F) {
        self.rows.retain(f);
    }

    /// Verify every row renders exactly `width()` cells.
    pub fn check_shape(&self) -> Result<(), ShapeError> {
        let expected = self.width();
        for (row, r) in self.rows.iter().enumerate() {
            let found = r.cells().len();
            if found != expected {
                return Err(ShapeError {
                    row,
                    found,
                    expected,
                });
            }
        }
        Ok(())
    }
}

impl<R> IntoIterator for Table<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductRow, Store};
    use chrono::NaiveDate;

    fn sample() -> AnnotatedRow {
        ProductRow::new("Leche".into(), "Bs. 70.00".into(), true).annotate(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            Store::Plazas,
            "leche",
        )
    }

    #[test]
    fn test_raw_table_has_six_columns() {
        let table = Table::from_rows(vec![sample(), sample()]);
        assert_eq!(table.width(), 6);
        assert!(table.check_shape().is_ok());
        assert_eq!(table.rows()[0].cells()[3], "02/01/2024");
    }

    #[test]
    fn test_priced_table_has_seven_columns() {
        let table = Table::from_rows(vec![sample().with_usd(Some(2.0)), sample().with_usd(None)]);
        assert_eq!(table.width(), 7);
        assert!(table.check_shape().is_ok());
        assert_eq!(table.rows()[0].cells()[6], "2.00");
        assert_eq!(table.rows()[1].cells()[6], "");
    }
}
