//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the BookStore trait.

use crate::scraper::ScrapedBook;
use crate::storage::schema::{initialize_schema, reset_schema};
use crate::storage::traits::{BookStore, PersistenceError, PersistenceResult};
use crate::storage::{BookRecord, PriceSummary, UpsertOutcome};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates a new SqliteStore instance
    ///
    /// Opens or creates the database file and initializes the schema.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(PersistenceError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path).map_err(|e| PersistenceError::Open {
            path: path.display().to_string(),
            source: e,
        })?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Drops and recreates the schema, discarding all stored books
    pub fn reset(&self) -> PersistenceResult<()> {
        reset_schema(&self.conn)?;
        Ok(())
    }
}

/// Maps a full books row to a BookRecord
fn row_to_book(row: &Row) -> rusqlite::Result<BookRecord> {
    Ok(BookRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        price: row.get(2)?,
        rating: row.get(3)?,
        availability: row.get(4)?,
        source_url: row.get(5)?,
        scraped_at: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

const BOOK_COLUMNS: &str =
    "id, title, price, rating, availability, source_url, scraped_at, created_at, updated_at";

impl BookStore for SqliteStore {
    fn upsert_book(&mut self, book: &ScrapedBook) -> PersistenceResult<UpsertOutcome> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM books WHERE source_url = ?1",
                params![book.source_url],
                |row| row.get(0),
            )
            .optional()?;

        // created_at is written once; conflicting writes leave it alone
        tx.execute(
            "INSERT INTO books
             (title, price, rating, availability, source_url, scraped_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6, ?6)
             ON CONFLICT(source_url) DO UPDATE SET
                 title = excluded.title,
                 price = excluded.price,
                 rating = excluded.rating,
                 availability = excluded.availability,
                 scraped_at = excluded.scraped_at,
                 updated_at = excluded.updated_at",
            params![
                book.title,
                book.price,
                book.rating,
                book.availability,
                book.source_url,
                now
            ],
        )?;

        tx.commit()?;

        Ok(match existing {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Inserted,
        })
    }

    fn get_book_by_url(&self, source_url: &str) -> PersistenceResult<Option<BookRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM books WHERE source_url = ?1",
            BOOK_COLUMNS
        ))?;

        let book = stmt
            .query_row(params![source_url], row_to_book)
            .optional()?;

        Ok(book)
    }

    fn list_books(&self, limit: Option<u32>) -> PersistenceResult<Vec<BookRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM books ORDER BY scraped_at DESC, id DESC LIMIT ?1",
            BOOK_COLUMNS
        ))?;

        // A negative LIMIT means no limit to SQLite
        let limit = limit.map(|n| n as i64).unwrap_or(-1);
        let books = stmt
            .query_map(params![limit], row_to_book)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(books)
    }

    fn count_books(&self) -> PersistenceResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn price_summary(&self) -> PersistenceResult<Option<PriceSummary>> {
        let (average, minimum, maximum) = self.conn.query_row(
            "SELECT AVG(price), MIN(price), MAX(price) FROM books",
            [],
            |row| {
                Ok((
                    row.get::<_, Option<f64>>(0)?,
                    row.get::<_, Option<f64>>(1)?,
                    row.get::<_, Option<f64>>(2)?,
                ))
            },
        )?;

        Ok(match (average, minimum, maximum) {
            (Some(average), Some(minimum), Some(maximum)) => Some(PriceSummary {
                average,
                minimum,
                maximum,
            }),
            _ => None,
        })
    }

    fn rating_breakdown(&self) -> PersistenceResult<HashMap<u8, u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT rating, COUNT(*) FROM books GROUP BY rating ORDER BY rating")?;

        let rows = stmt.query_map([], |row| Ok((row.get::<_, u8>(0)?, row.get::<_, i64>(1)?)))?;

        let mut breakdown = HashMap::new();
        for row in rows {
            let (rating, count) = row?;
            breakdown.insert(rating, count as u64);
        }

        Ok(breakdown)
    }
}
