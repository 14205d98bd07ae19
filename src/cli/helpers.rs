//! Shared helper functions for CLI commands.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use super::commands::RateSourceArg;
use crate::config::Settings;
use crate::models::{PricedRow, RateSourceKind, Table, Tabular};
use crate::scrapers::HttpClient;
use crate::services::{BcvRateSource, FixedRate, MonitorRateSource, RateSource};

/// Build the HTTP client from settings.
pub fn build_http_client(settings: &Settings) -> anyhow::Result<HttpClient> {
    HttpClient::new(&settings.fetcher_config()).context("Failed to build HTTP client")
}

/// Pick the rate source: a fixed rate wins, then the CLI choice, then config.
pub fn rate_source(
    settings: &Settings,
    client: &HttpClient,
    choice: Option<RateSourceArg>,
    fixed: Option<f64>,
) -> Box<dyn RateSource> {
    if let Some(rate) = fixed {
        return Box::new(FixedRate(rate));
    }

    let kind = match choice {
        Some(RateSourceArg::Bcv) => RateSourceKind::Bcv,
        Some(RateSourceArg::Monitor) => RateSourceKind::SocialMonitor,
        None => settings.rate_source,
    };

    match kind {
        RateSourceKind::SocialMonitor => Box::new(
            MonitorRateSource::new(
                client.inner().clone(),
                settings.monitor_bearer_token.clone(),
            )
            .with_account(settings.monitor_account.clone()),
        ),
        RateSourceKind::Bcv | RateSourceKind::Fixed => {
            Box::new(BcvRateSource::new(Arc::new(client.clone())))
        }
    }
}

/// Parse a one-column food list.
///
/// Blank lines and `#` comments are skipped, as is a leading header line
/// reading `food` or `product`. Quotes around a term are stripped.
pub fn parse_terms(contents: &str) -> Vec<String> {
    let mut terms = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        let term = line.trim().trim_matches('"').trim();
        if term.is_empty() || term.starts_with('#') {
            continue;
        }
        if idx == 0 && matches!(term.to_lowercase().as_str(), "food" | "foods" | "product") {
            continue;
        }
        terms.push(term.to_string());
    }
    terms
}

/// Terms from the command line followed by those in `file`.
pub fn collect_terms(args: &[String], file: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let mut terms: Vec<String> = args
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if let Some(path) = file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        terms.extend(parse_terms(&contents));
    }
    Ok(terms)
}

/// Render rows as aligned text columns.
pub fn format_table(table: &Table<PricedRow>) -> String {
    let header: Vec<String> = PricedRow::COLUMNS.iter().map(|c| c.to_string()).collect();
    let body: Vec<Vec<String>> = table.iter().map(|r| r.cells()).collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let render = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = render(&header);
    for cells in &body {
        out.push('\n');
        out.push_str(&render(cells));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductRow, Store};
    use chrono::NaiveDate;

    #[test]
    fn test_parse_terms_skips_header_and_comments() {
        let terms = parse_terms("food\n# staples\narroz\n\n  leche en polvo \n\"harina\"\n");
        assert_eq!(terms, vec!["arroz", "leche en polvo", "harina"]);
    }

    #[test]
    fn test_header_only_skipped_on_first_line() {
        let terms = parse_terms("arroz\nproduct\n");
        assert_eq!(terms, vec!["arroz", "product"]);
    }

    #[test]
    fn test_collect_terms_args_then_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foods.csv");
        std::fs::write(&path, "product\npan\n").unwrap();

        let terms = collect_terms(&["arroz".to_string(), " ".to_string()], Some(&path)).unwrap();
        assert_eq!(terms, vec!["arroz", "pan"]);
    }

    #[test]
    fn test_format_table_aligns_columns() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let table = Table::from_rows(vec![ProductRow::new("Pan".into(), "Bs. 70.00".into(), true)
            .annotate(date, Store::Plazas, "pan")
            .with_usd(Some(2.0))]);
        let text = format_table(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("product_name"));
        assert!(lines[1].contains("15/03/2024"));
        assert!(lines[1].ends_with("2.00"));
    }
}
