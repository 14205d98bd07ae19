//! SQLite persistence for scraped prices.

mod price;

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use thiserror::Error;

pub use price::{PriceStore, PRICE_TABLE};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("could not create {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Open a connection with the pragmas every store expects.
pub fn connect(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    Ok(conn)
}
