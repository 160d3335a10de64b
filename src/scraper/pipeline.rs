//! Pipeline orchestration - the fetch, parse, persist loop
//!
//! This module contains the run loop that coordinates the pipeline:
//! - Fetching listing pages, starting from the configured base URL
//! - Parsing each page into book records
//! - Upserting every record into the store
//! - Following the parsed next-page link until the site or the page
//!   budget runs out
//! - Accumulating per-run counters for the final report

use crate::config::ScraperConfig;
use crate::scraper::fetcher::Fetcher;
use crate::scraper::parser::parse_listing;
use crate::storage::{BookStore, UpsertOutcome};
use crate::{ConfigError, PipelineError};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

/// Counters accumulated over one pipeline run
///
/// These live in memory only; they are reported when the run ends and
/// then discarded.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Listing pages fetched and parsed
    pub pages_visited: u32,

    /// Records successfully extracted from those pages
    pub records_extracted: u32,

    /// Records lost to malformed markup or a record-level store failure
    pub records_failed: u32,

    /// Extracted records that created a new row
    pub books_inserted: u32,

    /// Extracted records that refreshed an existing row
    pub books_updated: u32,

    /// Wall-clock time of the whole run
    pub duration: Duration,
}

/// Drives the fetch, parse, persist loop over a paginated listing
pub struct Pipeline<S: BookStore> {
    config: ScraperConfig,
    fetcher: Fetcher,
    store: S,
}

impl<S: BookStore> Pipeline<S> {
    /// Creates a pipeline from the scraper configuration and a store
    pub fn new(config: &ScraperConfig, store: S) -> Result<Self, PipelineError> {
        let fetcher = Fetcher::new(config)?;
        Ok(Self {
            config: config.clone(),
            fetcher,
            store,
        })
    }

    /// The store this pipeline persists into
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the pipeline to completion
    ///
    /// Pages are processed strictly one at a time. The loop ends when a page
    /// has no next-page link or when `max_pages` pages have been visited.
    ///
    /// A fetch failure on the first page fails the run, since nothing was
    /// accomplished. On a later page it ends pagination instead, and the run
    /// still reports what it got. A record-level store failure is counted
    /// and skipped; losing the database ends the run with an error.
    ///
    /// # Returns
    ///
    /// * `Ok(RunStats)` - Counters for the finished run
    /// * `Err(PipelineError)` - The failure that ended the run early
    pub async fn run(&mut self) -> Result<RunStats, PipelineError> {
        let start_url = Url::parse(&self.config.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

        info!("Starting scrape from {}", start_url);

        let started = Instant::now();
        let mut stats = RunStats::default();
        let mut next_url = Some(start_url);

        loop {
            let page_url = match next_url.take() {
                Some(url) => url,
                None => {
                    info!("No next page link, pagination complete");
                    break;
                }
            };

            if let Some(max_pages) = self.config.max_pages {
                if stats.pages_visited >= max_pages {
                    info!("Reached the {} page budget, stopping", max_pages);
                    break;
                }
            }

            let body = match self.fetcher.fetch_page(&page_url).await {
                Ok(body) => body,
                Err(fetch_error) => {
                    if stats.pages_visited == 0 {
                        return Err(fetch_error.into());
                    }
                    warn!("Stopping pagination at {}: {}", page_url, fetch_error);
                    break;
                }
            };

            let listing = parse_listing(&body, &page_url);
            stats.pages_visited += 1;
            stats.records_extracted += listing.books.len() as u32;
            stats.records_failed += listing.skipped.len() as u32;

            for reason in &listing.skipped {
                warn!("Skipped an entry on {}: {}", page_url, reason);
            }

            for book in &listing.books {
                match self.store.upsert_book(book) {
                    Ok(UpsertOutcome::Inserted) => stats.books_inserted += 1,
                    Ok(UpsertOutcome::Updated) => stats.books_updated += 1,
                    Err(e) if e.is_connection_loss() => {
                        error!("Lost the database while persisting {}: {}", book.source_url, e);
                        return Err(e.into());
                    }
                    Err(e) => {
                        warn!("Failed to persist {}: {}", book.source_url, e);
                        stats.records_failed += 1;
                    }
                }
            }

            debug!(
                "Page {} done: {} extracted, {} skipped",
                page_url,
                listing.books.len(),
                listing.skipped.len()
            );

            next_url = listing.next_page;
        }

        stats.duration = started.elapsed();
        info!(
            "Scrape complete: {} pages, {} records in {:.2}s",
            stats.pages_visited,
            stats.records_extracted,
            stats.duration.as_secs_f64()
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> ScraperConfig {
        ScraperConfig {
            base_url: base_url.to_string(),
            user_agent: "TestAgent/1.0".to_string(),
            request_timeout_secs: 5,
            max_retries: 0,
            retry_base_delay_ms: 10,
            max_pages: None,
        }
    }

    #[tokio::test]
    async fn test_first_page_failure_fails_the_run() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = SqliteStore::new_in_memory().unwrap();
        let mut pipeline = Pipeline::new(&test_config(&server.uri()), store).unwrap();
        let result = pipeline.run().await;

        assert!(matches!(result.unwrap_err(), PipelineError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_single_page_run_accumulates_stats() {
        let html = r#"<html><body>
            <article class="product_pod">
                <p class="star-rating Three"></p>
                <h3><a href="whole/index.html" title="Whole Book">Whole Book</a></h3>
                <p class="price_color">£20.00</p>
                <p class="instock availability">In stock</p>
            </article>
            <article class="product_pod">
                <p class="star-rating Two"></p>
                <h3><a href="broken/index.html" title="Broken Book">Broken Book</a></h3>
            </article>
        </body></html>"#;

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&server)
            .await;

        let store = SqliteStore::new_in_memory().unwrap();
        let mut pipeline = Pipeline::new(&test_config(&server.uri()), store).unwrap();
        let stats = pipeline.run().await.unwrap();

        assert_eq!(stats.pages_visited, 1);
        assert_eq!(stats.records_extracted, 1);
        assert_eq!(stats.records_failed, 1);
        assert_eq!(stats.books_inserted, 1);
        assert_eq!(stats.books_updated, 0);
        assert_eq!(pipeline.store().count_books().unwrap(), 1);
    }
}
