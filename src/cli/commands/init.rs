//! Initialize command.

use console::style;

use crate::config::Settings;
use crate::repository::PriceStore;

/// Initialize the data directory and database.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_directories()?;

    let store = PriceStore::new(&settings.database_path())?;
    let rows = store.count()?;

    println!(
        "{} Initialized vfood in {}",
        style("✓").green(),
        settings.data_dir.display()
    );
    println!(
        "  Database: {} ({} rows)",
        store.path().display(),
        rows
    );

    Ok(())
}
