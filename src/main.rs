//! Quote-Harvest main entry point
//!
//! This is the command-line interface for the Quote-Harvest scraper.

use clap::Parser;
use quote_harvest::config::{load_config, validate, Config};
use quote_harvest::crawler::run_harvest;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Quote-Harvest: collects every quote from a paginated listing into a CSV file
///
/// With no arguments, Quote-Harvest reads https://quotes.toscrape.com/ page by
/// page until it runs out of quotes and writes them to ./quotes.csv.
#[derive(Parser, Debug)]
#[command(name = "quote-harvest")]
#[command(version)]
#[command(about = "Collects paginated quotes into a CSV file", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the CSV here instead of the configured path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Stop after this many pages
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show it without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    match run_harvest(&config).await {
        Ok(summary) => {
            tracing::info!(
                "Harvest complete: {} quotes from {} pages ({})",
                summary.quotes_written,
                summary.pages_fetched,
                summary.end
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quote_harvest=info,warn"),
            1 => EnvFilter::new("quote_harvest=debug,info"),
            2 => EnvFilter::new("quote_harvest=trace,debug"),
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

/// Loads the config file if one was given, then applies command-line overrides
fn resolve_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.path = output.to_string_lossy().into_owned();
    }
    if let Some(max_pages) = cli.max_pages {
        config.pagination.max_pages = Some(max_pages);
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Quote-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);

    println!("\nFetch:");
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Max retries: {}", config.fetch.max_retries);
    println!("  Backoff base: {}ms", config.fetch.backoff_base_ms);
    println!("  User agent: {}", config.fetch.user_agent);

    println!("\nPagination:");
    match config.pagination.max_pages {
        Some(n) => println!("  Max pages: {}", n),
        None => println!("  Max pages: unlimited"),
    }

    println!("\nOutput:");
    println!("  Path: {}", config.output.path);
    println!("  Tag delimiter: {:?}", config.output.tag_delimiter);

    println!("\n✓ Configuration is valid");
}
