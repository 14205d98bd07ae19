//! Exchange rate command.

use console::style;

use super::RateSourceArg;
use crate::cli::helpers::{build_http_client, rate_source};
use crate::config::Settings;

/// Fetch and print the current Bs./$ rate.
pub async fn cmd_rate(settings: &Settings, source: Option<RateSourceArg>) -> anyhow::Result<()> {
    let client = build_http_client(settings)?;
    let reading = rate_source(settings, &client, source, None).get_rate().await;

    match reading.rate {
        Some(_) => println!("{} {}", style("✓").green(), reading),
        None => println!(
            "{} Could not read the {} rate",
            style("!").yellow(),
            reading.source.label()
        ),
    }
    Ok(())
}
