//! HTTP client initialization.
//!
//! This module provides functions to initialize the HTTP clients used for
//! source fetches and remote geo lookups.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, REFERER};
use reqwest::ClientBuilder;

use crate::config::{Config, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_REFERER};
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used to fetch sources.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the config
/// - Browser-like `Accept-Language` and `Referer` headers
/// - Per-request timeout from the config
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails,
/// e.g. for a user agent that is not a valid header value.
pub fn init_client(config: &Config) -> Result<reqwest::Client, InitializationError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
    );
    headers.insert(REFERER, HeaderValue::from_static(DEFAULT_REFERER));

    ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .build()
        .map_err(InitializationError::from)
}

/// Initializes the HTTP client used by the remote geo lookup tier.
///
/// The client timeout equals the per-attempt lookup timeout, so a slow lookup
/// service cannot stall a record longer than the configured budget.
pub fn init_geo_client(config: &Config) -> Result<reqwest::Client, InitializationError> {
    ClientBuilder::new()
        .timeout(Duration::from_millis(config.remote_geo_timeout_ms))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(InitializationError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_with_defaults() {
        assert!(init_client(&Config::default()).is_ok());
        assert!(init_geo_client(&Config::default()).is_ok());
    }

    #[test]
    fn test_init_client_rejects_invalid_user_agent() {
        let config = Config {
            user_agent: "bad\nagent".to_string(),
            ..Default::default()
        };
        assert!(init_client(&config).is_err());
    }
}
