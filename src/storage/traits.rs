//! Storage traits and error types
//!
//! This module defines the trait interface for book storage backends and
//! associated error types.

use crate::scraper::ScrapedBook;
use crate::storage::{BookRecord, PriceSummary, UpsertOutcome};
use rusqlite::ErrorCode;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to open database at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl PersistenceError {
    /// Whether this error means the database itself is gone
    ///
    /// A record-level failure only loses that record; a connection-level
    /// failure means nothing further can be persisted and the caller should
    /// stop the run.
    pub fn is_connection_loss(&self) -> bool {
        let source = match self {
            Self::Open { .. } => return true,
            Self::Database(e) => e,
        };

        matches!(
            source,
            rusqlite::Error::SqliteFailure(error, _) if matches!(
                error.code,
                ErrorCode::CannotOpen
                    | ErrorCode::NotADatabase
                    | ErrorCode::DatabaseCorrupt
                    | ErrorCode::DiskFull
            )
        )
    }
}

/// Result type for storage operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Trait for book storage backends
///
/// This trait defines all database operations needed by the pipeline and
/// the reporting commands. A book's detail-page URL is its natural key:
/// writing the same URL twice must update the existing row, never add one.
pub trait BookStore {
    /// Inserts a scraped record or updates the row with its source URL
    ///
    /// Each call is atomic. The row's `created_at` is set on first insert
    /// and preserved by updates; `scraped_at` and `updated_at` move on
    /// every call.
    ///
    /// # Arguments
    ///
    /// * `book` - The record to persist
    ///
    /// # Returns
    ///
    /// Whether the call inserted a new row or updated an existing one
    fn upsert_book(&mut self, book: &ScrapedBook) -> PersistenceResult<UpsertOutcome>;

    /// Gets a stored book by its source URL
    fn get_book_by_url(&self, source_url: &str) -> PersistenceResult<Option<BookRecord>>;

    /// Lists stored books, most recently scraped first
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum rows to return; None returns everything
    fn list_books(&self, limit: Option<u32>) -> PersistenceResult<Vec<BookRecord>>;

    /// Counts stored books
    fn count_books(&self) -> PersistenceResult<u64>;

    /// Average, minimum, and maximum price; None when the store is empty
    fn price_summary(&self) -> PersistenceResult<Option<PriceSummary>>;

    /// Book count per rating value
    fn rating_breakdown(&self) -> PersistenceResult<HashMap<u8, u64>>;
}
