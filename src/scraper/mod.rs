//! Scraper module for listing-page fetching and processing
//!
//! This module contains the core pipeline logic, including:
//! - HTTP fetching with retry and backoff
//! - HTML parsing into book records
//! - Run orchestration across paginated listings

mod fetcher;
mod parser;
mod pipeline;

pub use fetcher::{build_http_client, FetchError, Fetcher};
pub use parser::{parse_listing, ParseError, ParsedListing, ScrapedBook};
pub use pipeline::{Pipeline, RunStats};
