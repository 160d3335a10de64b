//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the pipeline, including:
//! - Building an HTTP client with the configured user agent and timeouts
//! - GET requests for listing pages
//! - Bounded retry with exponential backoff for transient failures
//! - Error classification once the retry budget is spent

use crate::config::ScraperConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};
use url::Url;

/// Errors raised while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url} after {attempts} attempts")]
    Status {
        url: String,
        status: u16,
        attempts: u32,
    },

    #[error("Network error for {url} after {attempts} attempts: {source}")]
    Network {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use pageturner::config::ScraperConfig;
/// use pageturner::scraper::build_http_client;
///
/// let config = ScraperConfig::default();
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches listing pages over HTTP with bounded retry
pub struct Fetcher {
    client: Client,
    max_retries: u32,
    retry_base_delay_ms: u64,
}

impl Fetcher {
    /// Creates a fetcher from the scraper configuration
    pub fn new(config: &ScraperConfig) -> Result<Self, FetchError> {
        let client = build_http_client(config)?;
        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
        })
    }

    /// Fetches a page body, retrying failed attempts up to the configured cap
    ///
    /// Any non-2xx response or transport error counts as a failed attempt.
    /// After each failure the fetcher sleeps `retry_base_delay_ms * 2^n`
    /// before attempt `n + 2`, so a cap of 3 retries makes at most 4 requests.
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL of the page to fetch
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The response body
    /// * `Err(FetchError)` - The last failure once the cap is exhausted
    pub async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.attempt_fetch(url, attempts).await {
                Ok(body) => {
                    if attempts > 1 {
                        debug!("Fetched {} on attempt {}", url, attempts);
                    }
                    return Ok(body);
                }
                Err(fetch_error) => {
                    if attempts > self.max_retries {
                        error!(
                            "Giving up on {} after {} attempts: {}",
                            url, attempts, fetch_error
                        );
                        return Err(fetch_error);
                    }

                    let delay =
                        Duration::from_millis(self.retry_base_delay_ms * 2u64.pow(attempts - 1));
                    warn!(
                        "Fetch attempt {}/{} for {} failed ({}), retrying in {:?}",
                        attempts,
                        self.max_retries + 1,
                        url,
                        fetch_error,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Performs a single GET attempt
    async fn attempt_fetch(&self, url: &Url, attempts: u32) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                attempts,
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                attempts,
            });
        }

        response.text().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            attempts,
            source: e,
        })
    }
}
