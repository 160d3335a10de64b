//! Statistics and report generation from the book store
//!
//! This module provides functionality for extracting and displaying
//! aggregate statistics from the storage layer, and for printing the
//! per-run summary.

use crate::scraper::RunStats;
use crate::storage::{BookRecord, BookStore, PersistenceResult, PriceSummary};
use std::collections::HashMap;

/// Aggregate statistics over the stored books
#[derive(Debug, Clone)]
pub struct BookStatistics {
    /// Total number of stored books
    pub total_books: u64,

    /// Price aggregates; None when the store is empty
    pub price: Option<PriceSummary>,

    /// Book count per rating value
    pub rating_breakdown: HashMap<u8, u64>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The storage backend to query
///
/// # Returns
///
/// * `Ok(BookStatistics)` - Successfully loaded statistics
/// * `Err(PersistenceError)` - Failed to query statistics
pub fn load_statistics(store: &dyn BookStore) -> PersistenceResult<BookStatistics> {
    let total_books = store.count_books()?;
    let price = store.price_summary()?;
    let rating_breakdown = store.rating_breakdown()?;

    Ok(BookStatistics {
        total_books,
        price,
        rating_breakdown,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &BookStatistics) {
    println!("=== Book Statistics ===\n");

    println!("Overview:");
    println!("  Total books: {}", stats.total_books);

    match &stats.price {
        Some(price) => {
            println!("  Average price: {:.2}", price.average);
            println!("  Cheapest: {:.2}", price.minimum);
            println!("  Most expensive: {:.2}", price.maximum);
        }
        None => println!("  (no books stored yet)"),
    }
    println!();

    if !stats.rating_breakdown.is_empty() {
        println!("Books by Rating:");

        let mut rating_counts: Vec<_> = stats.rating_breakdown.iter().collect();
        rating_counts.sort_by_key(|(rating, _)| **rating);

        for (rating, count) in rating_counts {
            let percentage = if stats.total_books > 0 {
                (*count as f64 / stats.total_books as f64) * 100.0
            } else {
                0.0
            };
            println!("  {} star: {} ({:.1}%)", rating, count, percentage);
        }
    }
}

/// Prints the end-of-run summary to stdout
///
/// # Arguments
///
/// * `stats` - Counters from the finished run
/// * `total_books` - Books in the store after the run
pub fn print_run_summary(stats: &RunStats, total_books: u64) {
    println!("=== Scrape Summary ===\n");

    println!("  Pages visited: {}", stats.pages_visited);
    println!("  Records extracted: {}", stats.records_extracted);
    println!("  Records failed: {}", stats.records_failed);
    println!("  New books: {}", stats.books_inserted);
    println!("  Updated books: {}", stats.books_updated);
    println!("  Duration: {:.2}s", stats.duration.as_secs_f64());
    println!();
    println!("  Books in store: {}", total_books);
}

/// Prints stored books to stdout, one block per book
///
/// # Arguments
///
/// * `books` - The rows to display
/// * `total` - Total rows in the store, for the header
pub fn print_books(books: &[BookRecord], total: u64) {
    println!("=== Stored Books ({} of {}) ===\n", books.len(), total);

    for book in books {
        println!(
            "  {:>7.2}  {:<5}  {}",
            book.price,
            "*".repeat(book.rating as usize),
            book.title
        );
        println!("           {} | {}", book.availability, book.source_url);
    }
}
