use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;
use std::str::FromStr;

/// Environment variables recognized as configuration overrides
const ENV_OVERRIDES: &[&str] = &[
    "TARGET_URL",
    "USER_AGENT",
    "REQUEST_TIMEOUT",
    "MAX_RETRIES",
    "RETRY_BASE_DELAY_MS",
    "MAX_PAGES",
    "DATABASE_PATH",
];

/// Loads the effective configuration
///
/// Starts from the TOML file when a path is given, otherwise from built-in
/// defaults, then applies any environment variable overrides and validates
/// the result.
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use pageturner::config::load_config;
///
/// let config = load_config(None).unwrap();
/// println!("Scraping {}", config.scraper.base_url);
/// ```
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => Config::default(),
    };

    apply_env_overrides(&mut config)?;
    validate(&config)?;

    Ok(config)
}

/// Applies any set override variables from the process environment
pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
    for var in ENV_OVERRIDES {
        if let Ok(value) = std::env::var(var) {
            apply_override(config, var, &value)?;
        }
    }
    Ok(())
}

/// Applies a command-line page cap on top of the loaded configuration
///
/// The flag wins over the file and the environment. The merged result is
/// re-validated, so a cap the file would have been rejected for is rejected
/// here too.
pub fn apply_max_pages(config: &mut Config, max_pages: Option<u32>) -> Result<(), ConfigError> {
    if max_pages.is_some() {
        config.scraper.max_pages = max_pages;
        validate(config)?;
    }
    Ok(())
}

/// Applies a single named override to the configuration
fn apply_override(config: &mut Config, var: &str, value: &str) -> Result<(), ConfigError> {
    match var {
        "TARGET_URL" => config.scraper.base_url = value.to_string(),
        "USER_AGENT" => config.scraper.user_agent = value.to_string(),
        "REQUEST_TIMEOUT" => config.scraper.request_timeout_secs = parse_env(var, value)?,
        "MAX_RETRIES" => config.scraper.max_retries = parse_env(var, value)?,
        "RETRY_BASE_DELAY_MS" => config.scraper.retry_base_delay_ms = parse_env(var, value)?,
        "MAX_PAGES" => config.scraper.max_pages = Some(parse_env(var, value)?),
        "DATABASE_PATH" => config.database.path = value.to_string(),
        _ => {}
    }
    Ok(())
}

fn parse_env<T: FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[scraper]
base-url = "http://books.example.com/"
user-agent = "TestAgent/1.0"
request-timeout-secs = 5
max-retries = 2
retry-base-delay-ms = 50
max-pages = 10

[database]
path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.scraper.base_url, "http://books.example.com/");
        assert_eq!(config.scraper.user_agent, "TestAgent/1.0");
        assert_eq!(config.scraper.request_timeout_secs, 5);
        assert_eq!(config.scraper.max_retries, 2);
        assert_eq!(config.scraper.retry_base_delay_ms, 50);
        assert_eq!(config.scraper.max_pages, Some(10));
        assert_eq!(config.database.path, "./test.db");
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let config_content = r#"
[scraper]
base-url = "http://books.example.com/"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.scraper.base_url, "http://books.example.com/");
        assert_eq!(config.scraper.request_timeout_secs, 30);
        assert_eq!(config.scraper.max_retries, 3);
        assert_eq!(config.scraper.max_pages, None);
        assert_eq!(config.database.path, "./books.db");
    }

    #[test]
    fn test_builtin_defaults() {
        let config = Config::default();

        assert_eq!(config.scraper.base_url, "https://books.toscrape.com/");
        assert_eq!(config.scraper.request_timeout_secs, 30);
        assert_eq!(config.scraper.max_retries, 3);
        assert_eq!(config.scraper.retry_base_delay_ms, 1000);
        assert_eq!(config.scraper.max_pages, None);
        assert_eq!(config.database.path, "./books.db");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(Some(file.path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[scraper]
base-url = "ftp://books.example.com/"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(Some(file.path()));
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_apply_override_strings() {
        let mut config = Config::default();
        apply_override(&mut config, "TARGET_URL", "http://other.example.com/").unwrap();
        apply_override(&mut config, "DATABASE_PATH", "/tmp/books.db").unwrap();

        assert_eq!(config.scraper.base_url, "http://other.example.com/");
        assert_eq!(config.database.path, "/tmp/books.db");
    }

    #[test]
    fn test_apply_override_numbers() {
        let mut config = Config::default();
        apply_override(&mut config, "REQUEST_TIMEOUT", "30").unwrap();
        apply_override(&mut config, "MAX_RETRIES", "5").unwrap();
        apply_override(&mut config, "MAX_PAGES", "2").unwrap();

        assert_eq!(config.scraper.request_timeout_secs, 30);
        assert_eq!(config.scraper.max_retries, 5);
        assert_eq!(config.scraper.max_pages, Some(2));
    }

    #[test]
    fn test_apply_override_rejects_bad_number() {
        let mut config = Config::default();
        let result = apply_override(&mut config, "MAX_RETRIES", "lots");

        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidEnv { var, value } if var == "MAX_RETRIES" && value == "lots"
        ));
    }

    #[test]
    fn test_apply_max_pages_overrides_config() {
        let mut config = Config::default();
        config.scraper.max_pages = Some(10);

        apply_max_pages(&mut config, Some(2)).unwrap();

        assert_eq!(config.scraper.max_pages, Some(2));
    }

    #[test]
    fn test_apply_max_pages_keeps_config_when_unset() {
        let mut config = Config::default();
        config.scraper.max_pages = Some(10);

        apply_max_pages(&mut config, None).unwrap();

        assert_eq!(config.scraper.max_pages, Some(10));
    }

    #[test]
    fn test_apply_max_pages_rejects_zero() {
        let mut config = Config::default();
        let result = apply_max_pages(&mut config, Some(0));

        assert!(matches!(
            result.unwrap_err(),
            ConfigError::Validation(_)
        ));
    }
}
