//! Scrape command: search, convert, store, notify.

use std::path::PathBuf;

use anyhow::bail;
use chrono::Local;
use console::style;

use super::RateSourceArg;
use crate::cli::helpers::{build_http_client, collect_terms, format_table, rate_source};
use crate::config::Settings;
use crate::repository::PriceStore;
use crate::services::{convert, notify_quietly, summary_message, Aggregator, TelegramNotifier};

pub struct ScrapeOptions {
    pub terms: Vec<String>,
    pub file: Option<PathBuf>,
    pub rate: Option<f64>,
    pub rate_source: Option<RateSourceArg>,
    pub store: bool,
    pub notify: bool,
    pub json: bool,
}

pub async fn cmd_scrape(settings: &Settings, options: ScrapeOptions) -> anyhow::Result<()> {
    let terms = collect_terms(&options.terms, options.file.as_deref())?;
    if terms.is_empty() {
        bail!("No foods to search for; pass terms or --file");
    }

    let client = build_http_client(settings)?;

    if !options.json {
        println!(
            "{} Searching {} foods in {} stores",
            style("→").cyan(),
            terms.len(),
            settings.sites().len()
        );
    }

    let table = Aggregator::new(&client)
        .with_sites(settings.sites())
        .with_pause(settings.term_pause())
        .search(&terms)
        .await?;

    let reading = rate_source(settings, &client, options.rate_source, options.rate)
        .get_rate()
        .await;
    if reading.usable().is_none() {
        eprintln!(
            "{} No usable exchange rate; bolivar prices get no dollar value",
            style("!").yellow()
        );
    }

    let priced = convert(table, reading.usable())?;

    let stored = if options.store && !priced.is_empty() {
        let store = PriceStore::new(&settings.database_path())?;
        Some(store.append(&priced)?)
    } else {
        None
    };

    if options.notify {
        let notifier = TelegramNotifier::new(
            client.inner().clone(),
            settings.telegram_token.clone(),
            settings.telegram_chat_id.clone(),
        );
        let extras = [
            format!("Rate: {}", reading),
            format!("Rows: {}", priced.len()),
        ];
        let message = summary_message(&terms, &extras, Local::now());
        notify_quietly(&notifier, &message).await;
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(priced.rows())?);
        return Ok(());
    }

    if priced.is_empty() {
        println!("{} No data was found for the list of products", style("!").yellow());
        return Ok(());
    }

    println!("{}", format_table(&priced));
    println!();
    println!(
        "{} {} rows, rate {}",
        style("✓").green(),
        priced.len(),
        reading
    );
    if let Some(count) = stored {
        println!(
            "  Stored {} rows in {}",
            count,
            settings.database_path().display()
        );
    }
    Ok(())
}
