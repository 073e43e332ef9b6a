//! Hotel-Harvest main entry point
//!
//! This is the command-line interface for the Hotel-Harvest listing collector.

use anyhow::Context;
use clap::Parser;
use hotel_harvest::config::{resolve_config, Overrides};
use hotel_harvest::crawler::crawl;
use hotel_harvest::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Hotel-Harvest: collect hotel listings from a travel search
///
/// Hotel-Harvest drives a headless browser through the search results for a
/// location, visits every listing's detail page and writes the unique
/// hotels it finds to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "hotel-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Collect hotel listings into a CSV file", long_about = None)]
struct Cli {
    /// Location to search for hotels [default: New York]
    #[arg(long)]
    location: Option<String>,

    /// Maximum number of hotels to collect (all if omitted)
    #[arg(long, value_name = "N")]
    max_hotels: Option<u64>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Where to write the CSV file [default: hotels_data.csv]
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    headful: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Nothing escapes past here: report it and exit normally
    if let Err(e) = run(cli) {
        tracing::error!("An error occurred: {:#}", e);
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hotel_harvest=info,warn"),
            1 => EnvFilter::new("hotel_harvest=debug,info"),
            2 => EnvFilter::new("hotel_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Resolves configuration, runs the crawl and prints the report
fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = Overrides {
        location: cli.location,
        max_hotels: cli.max_hotels,
        output_path: cli.output,
        headful: cli.headful,
    };

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let (config, config_hash) = resolve_config(cli.config.as_deref(), &overrides)
        .context("Failed to load configuration")?;
    if let Some(hash) = config_hash {
        tracing::info!("Configuration loaded successfully (hash: {})", hash);
    }

    match config.search.max_hotels {
        Some(cap) => tracing::info!("Collecting up to {} hotels", cap),
        None => tracing::info!("Collecting all hotels"),
    }

    let report = crawl(&config).context("Crawl failed")?;
    print_report(&report);

    Ok(())
}
