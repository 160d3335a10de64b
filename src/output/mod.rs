//! Output module for run reports and stored-book summaries
//!
//! This module handles:
//! - Loading aggregate statistics from the store
//! - Printing run summaries, statistics, and book listings to stdout

pub mod stats;

pub use stats::{
    load_statistics, print_books, print_run_summary, print_statistics, BookStatistics,
};
