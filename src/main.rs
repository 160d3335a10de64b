//! Pageturner main entry point
//!
//! This is the command-line interface for the Pageturner scrape pipeline.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pageturner::config::{load_config, Config};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Pageturner: a book-catalogue scrape pipeline
///
/// Pageturner walks a paginated book listing, extracts structured records,
/// and upserts them into a SQLite database keyed by each book's detail-page
/// URL. Re-running a scrape refreshes existing rows instead of duplicating
/// them.
#[derive(Parser, Debug)]
#[command(name = "pageturner")]
#[command(version = "1.0.0")]
#[command(about = "Scrape book listings into SQLite", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults plus environment otherwise)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the scrape pipeline and print a run summary
    Scrape {
        /// Maximum listing pages to visit this run
        #[arg(long, value_name = "N")]
        max_pages: Option<u32>,
    },

    /// Create the database schema
    InitDb {
        /// Drop existing tables first, discarding stored books
        #[arg(long)]
        reset: bool,
    },

    /// List stored books, most recently scraped first
    List {
        /// Maximum rows to print
        #[arg(long, value_name = "N", default_value_t = 20)]
        limit: u32,
    },

    /// Show statistics over the stored books
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::debug!("No config file given, using defaults and environment"),
    }
    let config =
        load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Scrape { max_pages } => handle_scrape(config, max_pages).await,
        Command::InitDb { reset } => handle_init_db(&config, reset),
        Command::List { limit } => handle_list(&config, limit),
        Command::Stats => handle_stats(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pageturner=info,warn"),
            1 => EnvFilter::new("pageturner=debug,info"),
            2 => EnvFilter::new("pageturner=trace,debug"),
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

/// Handles the scrape subcommand: runs the pipeline and reports the run
async fn handle_scrape(mut config: Config, max_pages: Option<u32>) -> Result<()> {
    use pageturner::config::apply_max_pages;
    use pageturner::output::print_run_summary;
    use pageturner::scraper::Pipeline;
    use pageturner::storage::{BookStore, SqliteStore};

    // The command-line flag wins over the file and the environment
    apply_max_pages(&mut config, max_pages)?;

    let store = SqliteStore::new(Path::new(&config.database.path))
        .context("Failed to open the database")?;
    let mut pipeline = Pipeline::new(&config.scraper, store)?;

    let stats = pipeline.run().await.context("Scrape run failed")?;
    let total_books = pipeline.store().count_books()?;

    print_run_summary(&stats, total_books);

    Ok(())
}

/// Handles the init-db subcommand: creates (or resets) the schema
fn handle_init_db(config: &Config, reset: bool) -> Result<()> {
    use pageturner::storage::SqliteStore;

    // Opening the store initializes the schema if it is missing
    let store = SqliteStore::new(Path::new(&config.database.path))
        .context("Failed to open the database")?;

    if reset {
        store.reset().context("Failed to reset the schema")?;
        println!("Database reset at {}", config.database.path);
    } else {
        println!("Database ready at {}", config.database.path);
    }

    Ok(())
}

/// Handles the list subcommand: prints stored books
fn handle_list(config: &Config, limit: u32) -> Result<()> {
    use pageturner::output::print_books;
    use pageturner::storage::{BookStore, SqliteStore};

    let store = SqliteStore::new(Path::new(&config.database.path))
        .context("Failed to open the database")?;
    let books = store.list_books(Some(limit))?;
    let total = store.count_books()?;

    print_books(&books, total);

    Ok(())
}

/// Handles the stats subcommand: shows statistics from the database
fn handle_stats(config: &Config) -> Result<()> {
    use pageturner::output::{load_statistics, print_statistics};
    use pageturner::storage::SqliteStore;

    println!("Database: {}\n", config.database.path);

    let store = SqliteStore::new(Path::new(&config.database.path))
        .context("Failed to open the database")?;
    let stats = load_statistics(&store)?;

    print_statistics(&stats);

    Ok(())
}
