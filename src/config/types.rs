use serde::Deserialize;

/// Main configuration structure for Pageturner
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// First listing page to fetch; pagination follows from here
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Retries after a failed attempt; total attempts = max-retries + 1
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay (milliseconds); doubles on each retry
    #[serde(rename = "retry-base-delay-ms", default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Maximum listing pages to visit per run; unset means unbounded
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub path: String,
}

fn default_base_url() -> String {
    "https://books.toscrape.com/".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

fn default_database_path() -> String {
    "./books.db".to_string()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            max_pages: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}
