//! Pageturner: a book-catalogue scrape-and-persist pipeline
//!
//! This crate implements a small ETL pipeline that walks a paginated book
//! listing, extracts structured records, and upserts them into SQLite,
//! deduplicating on each book's source URL.

pub mod config;
pub mod output;
pub mod scraper;
pub mod storage;

use thiserror::Error;

/// Top-level error type for pipeline runs
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crate::scraper::FetchError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] crate::storage::PersistenceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: String, value: String },
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::scraper::{FetchError, Fetcher, ParseError, Pipeline, RunStats, ScrapedBook};
pub use crate::storage::{BookRecord, BookStore, PersistenceError, SqliteStore, UpsertOutcome};
