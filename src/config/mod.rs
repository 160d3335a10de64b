//! Configuration module for Pageturner
//!
//! This module handles loading and validating configuration from an optional
//! TOML file, built-in defaults, and environment variable overrides.
//!
//! # Example
//!
//! ```no_run
//! use pageturner::config::load_config;
//!
//! let config = load_config(None).unwrap();
//! println!("Scraping {} into {}", config.scraper.base_url, config.database.path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, DatabaseConfig, ScraperConfig};

// Re-export parser functions
pub use parser::{apply_env_overrides, apply_max_pages, load_config};
