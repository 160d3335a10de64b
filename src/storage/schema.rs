//! Database schema definitions
//!
//! This module contains the SQL schema for the Pageturner database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Scraped book records, one row per detail-page URL
CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    price REAL NOT NULL,
    rating INTEGER NOT NULL,
    availability TEXT NOT NULL,
    source_url TEXT NOT NULL UNIQUE,
    scraped_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_books_title ON books(title);
CREATE INDEX IF NOT EXISTS idx_books_rating ON books(rating);
"#;

/// SQL to drop everything the schema creates
const DROP_SQL: &str = r#"
DROP INDEX IF EXISTS idx_books_title;
DROP INDEX IF EXISTS idx_books_rating;
DROP TABLE IF EXISTS books;
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Drops and recreates the schema, discarding all stored books
pub fn reset_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(DROP_SQL)?;
    initialize_schema(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::{params, Connection};

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        let result = initialize_schema(&conn);
        assert!(result.is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        // Initialize twice
        initialize_schema(&conn).unwrap();
        let result = initialize_schema(&conn);

        // Should succeed the second time too
        assert!(result.is_ok());
    }

    #[test]
    fn test_books_table_exists_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='books'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_source_url_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let insert = "INSERT INTO books
             (title, price, rating, availability, source_url, scraped_at, created_at, updated_at)
             VALUES (?1, 10.0, 3, 'In stock', ?2, 't', 't', 't')";

        conn.execute(insert, params!["First", "http://example.com/book"])
            .unwrap();
        let duplicate = conn.execute(insert, params!["Second", "http://example.com/book"]);

        assert!(duplicate.is_err());
    }

    #[test]
    fn test_reset_discards_rows() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO books
             (title, price, rating, availability, source_url, scraped_at, created_at, updated_at)
             VALUES ('Book', 10.0, 3, 'In stock', 'http://example.com/book', 't', 't', 't')",
            [],
        )
        .unwrap();

        reset_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
