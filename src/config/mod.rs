//! Configuration module for the warranty admin client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::ClientError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the warranty REST API, without trailing slash
    pub api_base_url: String,
    /// File holding the token of the logged-in session
    pub session_path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Rows per page in list views
    pub page_size: usize,
    /// Per-request timeout
    pub http_timeout: Duration,
    /// Retries for idempotent GET requests
    pub get_retries: u32,
    /// Backoff before the first retry; doubles on each further attempt
    pub retry_base_delay: Duration,
    /// Minimum age of a view's data before navigation refetches it
    pub refetch_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080/api".to_string(),
            session_path: PathBuf::from("./.evw/session.json"),
            log_level: "warn".to_string(),
            page_size: 10,
            http_timeout: Duration::from_secs(30),
            get_retries: 2,
            retry_base_delay: Duration::from_millis(200),
            refetch_interval: Duration::from_millis(1000),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let api_base_url = env::var("EVW_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let session_path = env::var("EVW_SESSION_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_path);

        let log_level = env::var("EVW_LOG_LEVEL").unwrap_or(defaults.log_level);

        let page_size: usize = parse_var("EVW_PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 {
            return Err(ClientError::Config(
                "EVW_PAGE_SIZE must be greater than zero".to_string(),
            ));
        }

        let http_timeout = Duration::from_secs(parse_var(
            "EVW_HTTP_TIMEOUT_SECS",
            defaults.http_timeout.as_secs(),
        )?);

        let get_retries = parse_var("EVW_GET_RETRIES", defaults.get_retries)?;

        let retry_base_delay = Duration::from_millis(parse_var(
            "EVW_RETRY_BASE_MS",
            defaults.retry_base_delay.as_millis() as u64,
        )?);

        let refetch_interval = Duration::from_millis(parse_var(
            "EVW_REFETCH_INTERVAL_MS",
            defaults.refetch_interval.as_millis() as u64,
        )?);

        Ok(Self {
            api_base_url,
            session_path,
            log_level,
            page_size,
            http_timeout,
            get_retries,
            retry_base_delay,
            refetch_interval,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ClientError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ClientError::Config(format!("Invalid {} value: {:?}", name, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases share one test so they never race on the process environment.
    #[test]
    fn test_config_from_env() {
        for name in [
            "EVW_API_BASE_URL",
            "EVW_SESSION_PATH",
            "EVW_LOG_LEVEL",
            "EVW_PAGE_SIZE",
            "EVW_HTTP_TIMEOUT_SECS",
            "EVW_GET_RETRIES",
            "EVW_RETRY_BASE_MS",
            "EVW_REFETCH_INTERVAL_MS",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8080/api");
        assert_eq!(config.session_path, PathBuf::from("./.evw/session.json"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.get_retries, 2);

        env::set_var("EVW_API_BASE_URL", "https://warranty.example.com/api/");
        env::set_var("EVW_PAGE_SIZE", "25");
        let config = Config::from_env().unwrap();
        assert_eq!(config.api_base_url, "https://warranty.example.com/api");
        assert_eq!(config.page_size, 25);

        env::set_var("EVW_PAGE_SIZE", "lots");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));

        env::set_var("EVW_PAGE_SIZE", "0");
        assert!(Config::from_env().is_err());

        env::remove_var("EVW_API_BASE_URL");
        env::remove_var("EVW_PAGE_SIZE");
    }
}
