//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod init;
mod rate;
mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};

/// Rate source selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RateSourceArg {
    /// Banco Central de Venezuela
    Bcv,
    /// Monitor account posts
    Monitor,
}

#[derive(Parser)]
#[command(name = "vfood")]
#[command(about = "Venezuelan supermarket price scraper")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and price database
    Init,

    /// Search every store for the given foods and convert prices to dollars
    Scrape {
        /// Foods to search for
        terms: Vec<String>,
        /// File with one food per line
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Bs./$ rate to use instead of fetching one
        #[arg(short, long)]
        rate: Option<f64>,
        /// Where to fetch the rate from [default: from config, else bcv]
        #[arg(long, value_enum)]
        rate_source: Option<RateSourceArg>,
        /// Don't write results to the database
        #[arg(long)]
        no_store: bool,
        /// Send a summary through Telegram
        #[arg(long)]
        notify: bool,
        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current exchange rate
    Rate {
        /// Where to fetch the rate from [default: from config, else bcv]
        #[arg(long, value_enum)]
        source: Option<RateSourceArg>,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
    };
    let (settings, _config) = load_settings_with_options(options).await;

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Scrape {
            terms,
            file,
            rate,
            rate_source,
            no_store,
            notify,
            json,
        } => {
            let options = scrape::ScrapeOptions {
                terms,
                file,
                rate,
                rate_source,
                store: !no_store,
                notify,
                json,
            };
            scrape::cmd_scrape(&settings, options).await
        }
        Commands::Rate { source } => rate::cmd_rate(&settings, source).await,
    }
}
