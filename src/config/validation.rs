use crate::config::types::{Config, DatabaseConfig, ScraperConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_database_config(&config.database)?;
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    let base_url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base_url.scheme() != "http" && base_url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use http or https, got '{}'",
            base_url.scheme()
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.retry_base_delay_ms < 1 || config.retry_base_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "retry-base-delay-ms must be between 1 and 60000, got {}",
            config.retry_base_delay_ms
        )));
    }

    if let Some(max_pages) = config.max_pages {
        if max_pages < 1 {
            return Err(ConfigError::Validation(format!(
                "max-pages must be >= 1, got {}",
                max_pages
            )));
        }
    }

    Ok(())
}

/// Validates database configuration
fn validate_database_config(config: &DatabaseConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "database path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut config = Config::default();
        config.scraper.base_url = "ftp://books.example.com/".to_string();

        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_rejects_unparseable_base_url() {
        let mut config = Config::default();
        config.scraper.base_url = "not a url".to_string();

        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.scraper.user_agent = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = Config::default();
        config.scraper.request_timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_excessive_retries() {
        let mut config = Config::default();
        config.scraper.max_retries = 11;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_max_pages() {
        let mut config = Config::default();
        config.scraper.max_pages = Some(0);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_empty_database_path() {
        let mut config = Config::default();
        config.database.path = String::new();
        assert!(validate(&config).is_err());
    }
}
