//! Append-only price history.

use std::path::{Path, PathBuf};

use rusqlite::params;
use tracing::{debug, info};

use super::{connect, Result, StoreError};
use crate::models::{PricedRow, Table};

pub const PRICE_TABLE: &str = "food";

/// Date format of the `date_scrapt` column.
const STORED_DATE_FORMAT: &str = "%Y-%m-%d";

/// Price history in a SQLite file. Rows are only ever appended.
pub struct PriceStore {
    db_path: PathBuf,
}

impl PriceStore {
    /// Open (or create) the store and make sure the table exists.
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let store = Self {
            db_path: db_path.to_path_buf(),
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn init_schema(&self) -> Result<()> {
        let conn = connect(&self.db_path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS food (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                price_label TEXT NOT NULL,
                availability INTEGER NOT NULL,
                date_scrapt TEXT NOT NULL,
                store_name TEXT NOT NULL,
                search_term TEXT NOT NULL,
                price_dollar REAL
            );

            CREATE INDEX IF NOT EXISTS idx_food_date ON food(date_scrapt);
            CREATE INDEX IF NOT EXISTS idx_food_term ON food(search_term);
            "#,
        )?;
        debug!("Schema ready in {}", self.db_path.display());
        Ok(())
    }

    /// Insert every row of `table` in one transaction. Returns the number of
    /// rows written.
    pub fn append(&self, table: &Table<PricedRow>) -> Result<usize> {
        let mut conn = connect(&self.db_path)?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO food (name, price_label, availability, date_scrapt, store_name, search_term, price_dollar)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for priced in table {
                let row = &priced.row;
                stmt.execute(params![
                    row.product.product_name,
                    row.product.product_price,
                    row.product.product_availability,
                    row.date.format(STORED_DATE_FORMAT).to_string(),
                    row.store.display_name(),
                    row.search_term,
                    priced.product_price_dollar,
                ])?;
            }
        }
        tx.commit()?;

        info!("Stored {} rows in {}", table.len(), self.db_path.display());
        Ok(table.len())
    }

    /// Number of stored rows.
    pub fn count(&self) -> Result<usize> {
        let conn = connect(&self.db_path)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM food", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of stored rows for one search term.
    pub fn count_for_term(&self, term: &str) -> Result<usize> {
        let conn = connect(&self.db_path)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM food WHERE search_term = ?1",
            params![term],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductRow, Store};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn table(term: &str, n: usize) -> Table<PricedRow> {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        Table::from_rows(
            (0..n)
                .map(|i| {
                    ProductRow::new(format!("{} {}", term, i), "$ 1.00".into(), true)
                        .annotate(date, Store::Gama, term)
                        .with_usd(Some(1.0))
                })
                .collect(),
        )
    }

    #[test]
    fn test_appends_accumulate() {
        let dir = tempdir().unwrap();
        let store = PriceStore::new(&dir.path().join("prices.db")).unwrap();
        assert_eq!(store.count().unwrap(), 0);

        assert_eq!(store.append(&table("arroz", 3)).unwrap(), 3);
        assert_eq!(store.append(&table("arroz", 2)).unwrap(), 2);
        assert_eq!(store.count().unwrap(), 5);
        assert_eq!(store.count_for_term("arroz").unwrap(), 5);
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("prices.db");
        PriceStore::new(&path).unwrap().append(&table("pan", 2)).unwrap();

        let reopened = PriceStore::new(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 2);
    }

    #[test]
    fn test_absent_usd_stored_as_null() {
        let dir = tempdir().unwrap();
        let store = PriceStore::new(&dir.path().join("prices.db")).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let row = ProductRow::new("Pan".into(), "Bs. x".into(), false)
            .annotate(date, Store::Plazas, "pan")
            .with_usd(None);
        store.append(&Table::from_rows(vec![row])).unwrap();

        let conn = connect(store.path()).unwrap();
        let (usd, store_name, date): (Option<f64>, String, String) = conn
            .query_row(
                "SELECT price_dollar, store_name, date_scrapt FROM food",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(usd, None);
        assert_eq!(store_name, "Plazas");
        assert_eq!(date, "2024-03-15");
    }
}
