//! Workshop Harvest main entry point
//!
//! This is the command-line interface for the Workshop Harvest scraper.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use workshop_harvest::config::{apply_overrides, load_config_with_hash, Config, OutputMode};
use workshop_harvest::crawler::run_crawl;

/// Workshop Harvest: a Steam Workshop catalog scraper
///
/// Walks every page of a workshop catalog, visits each item's detail page,
/// and stores title, link, player count, rating, cover image and published
/// id either as a SQL dump or directly in a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "workshop-harvest")]
#[command(version)]
#[command(about = "A Steam Workshop catalog scraper", long_about = None)]
struct Cli {
    /// Path to TOML settings file
    #[arg(value_name = "SETTINGS")]
    settings: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the output mode from the settings file
    #[arg(long, value_name = "file|database")]
    mode: Option<OutputMode>,

    /// Stop after this many catalog pages (0 = no limit)
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Show the resolved settings and start URL without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics of the database table and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading settings from: {}", cli.settings.display());
    let (mut config, hash) = match load_config_with_hash(&cli.settings) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Failed to load settings: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!("Settings loaded successfully (hash: {})", hash);

    if let Err(e) = apply_overrides(&mut config, cli.mode, cli.max_pages) {
        tracing::error!("Invalid command-line overrides: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_crawl(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("workshop_harvest=info,warn"),
            1 => EnvFilter::new("workshop_harvest=debug,info"),
            2 => EnvFilter::new("workshop_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be crawled and where rows would go
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let start_url = config
        .catalog
        .first_page_url()
        .context("catalog URL is invalid")?;

    println!("=== Workshop Harvest Dry Run ===\n");

    println!("Catalog:");
    println!("  Start URL: {}", start_url);
    if config.catalog.max_pages > 0 {
        println!("  Page limit: {}", config.catalog.max_pages);
    } else {
        println!("  Page limit: none");
    }

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);

    println!("\nOutput:");
    println!("  Mode: {}", config.output.mode);
    println!("  Table: {}", config.output.table);
    match config.output.mode {
        OutputMode::File => println!("  SQL file: {}", config.output.sql_file),
        OutputMode::Database => {
            if let Some(db) = &config.database {
                println!("  Database: {}", db.path);
            }
        }
    }

    println!("\n✓ Settings are valid");
    Ok(())
}

/// Handles the --stats mode: shows statistics from the database table
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use workshop_harvest::storage::{load_statistics, print_statistics, SqliteStorage};

    let db = config
        .database
        .as_ref()
        .context("--stats needs a [database] section in the settings file")?;

    println!("Database: {}\n", db.path);

    let mut storage = SqliteStorage::open_existing(Path::new(&db.path), &config.output.table)
        .with_context(|| format!("cannot open database {}", db.path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);
    storage.close()?;

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Output mode: {} (table {})",
        config.output.mode,
        config.output.table
    );

    match run_crawl(config).await {
        Ok(report) => {
            tracing::info!(
                "Crawl completed successfully: {} pages, {} rows",
                report.pages,
                report.rows
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
