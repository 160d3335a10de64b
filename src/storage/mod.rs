//! Storage module for persisting scraped books
//!
//! This module handles all database operations for the pipeline, including:
//! - SQLite database initialization and schema management
//! - Upserting book records keyed by their source URL
//! - The read queries behind the listing and statistics commands

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{BookStore, PersistenceError, PersistenceResult};

/// Represents a stored book row
#[derive(Debug, Clone)]
pub struct BookRecord {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub rating: u8,
    pub availability: String,
    pub source_url: String,
    pub scraped_at: String,
    pub created_at: String,
    pub updated_at: String,
}

/// What an upsert did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new row was created
    Inserted,
    /// An existing row with the same source URL was refreshed
    Updated,
}

/// Aggregate price figures over the whole store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSummary {
    pub average: f64,
    pub minimum: f64,
    pub maximum: f64,
}
