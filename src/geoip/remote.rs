//! Country lookup through a remote JSON API.
//!
//! The URL is a template with an `{ip}` placeholder. The country code is read
//! from a (dot-separated) field of the JSON response. Requests are spaced by
//! a minimum interval so free-tier rate limits are respected.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_retry::RetryIf;

use super::{is_iso_code, GeoTier, GeoTierKind};
use crate::config::{Config, REMOTE_GEO_IP_PLACEHOLDER};
use crate::error_handling::{categorize_reqwest_error, categorize_status, get_retry_strategy};
use crate::models::CandidateRecord;

#[derive(Error, Debug)]
enum LookupError {
    #[error("transient lookup failure: {0}")]
    Transient(String),
    #[error("lookup failed: {0}")]
    Permanent(String),
}

impl LookupError {
    fn is_transient(&self) -> bool {
        matches!(self, LookupError::Transient(_))
    }
}

/// Remote geolocation tier.
pub struct RemoteLookup {
    client: reqwest::Client,
    url_template: String,
    field: String,
    retries: usize,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RemoteLookup {
    pub fn new(
        client: reqwest::Client,
        url_template: impl Into<String>,
        field: impl Into<String>,
        retries: usize,
        min_interval: Duration,
    ) -> Self {
        Self {
            client,
            url_template: url_template.into(),
            field: field.into(),
            retries,
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            client,
            config.remote_geo_url.clone(),
            config.remote_geo_field.clone(),
            config.remote_geo_retries,
            Duration::from_millis(config.remote_geo_interval_ms),
        )
    }

    fn url_for(&self, ip: &str) -> String {
        self.url_template.replace(REMOTE_GEO_IP_PLACEHOLDER, ip)
    }

    /// Waits until `min_interval` has passed since the previous request.
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn request_once(&self, url: &str) -> Result<Option<String>, LookupError> {
        self.throttle().await;

        let response = self.client.get(url).send().await.map_err(|e| {
            let kind = categorize_reqwest_error(&e);
            if kind.is_retriable() {
                LookupError::Transient(e.to_string())
            } else {
                LookupError::Permanent(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = format!("HTTP {}", status);
            return Err(if categorize_status(status).is_retriable() {
                LookupError::Transient(message)
            } else {
                LookupError::Permanent(message)
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LookupError::Permanent(e.to_string()))?;
        Ok(country_from_response(&body, &self.field))
    }

    /// Looks up the country of `ip`; any failure yields `None`.
    pub async fn lookup_country(&self, ip: &str) -> Option<String> {
        let url = self.url_for(ip);
        let result = RetryIf::spawn(
            get_retry_strategy(self.retries),
            || self.request_once(&url),
            LookupError::is_transient,
        )
        .await;

        match result {
            Ok(code) => code,
            Err(e) => {
                debug!("Remote geo lookup for {} failed: {}", ip, e);
                None
            }
        }
    }
}

/// Reads the country code at `field` (dot-separated path) from a response.
///
/// Responses reporting `"status": "fail"` carry no code.
pub(crate) fn country_from_response(body: &Value, field: &str) -> Option<String> {
    if body.get("status").and_then(Value::as_str) == Some("fail") {
        return None;
    }

    let value = field
        .split('.')
        .try_fold(body, |node, key| node.get(key))?
        .as_str()?
        .trim();
    is_iso_code(value).then(|| value.to_ascii_uppercase())
}

#[async_trait]
impl GeoTier for RemoteLookup {
    fn kind(&self) -> GeoTierKind {
        GeoTierKind::RemoteLookup
    }

    async fn resolve(&self, record: &CandidateRecord) -> Option<String> {
        self.lookup_country(&record.address).await
    }
}
