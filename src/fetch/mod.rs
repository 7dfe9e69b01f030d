//! Source retrieval.
//!
//! Fetches (or renders) one configured source with retry and exponential
//! backoff, and parses it into a [`Document`]. Only retriable failures
//! (timeouts, connection errors, 5xx, 429) are retried.

mod http;
mod render;

use std::time::Duration;

use log::{debug, warn};
use tokio_retry::RetryIf;
use url::Url;

use crate::config::Config;
use crate::error_handling::{get_retry_strategy, HarvestError, HarvestStats, SourceFailure};
use crate::extract::Document;
use crate::models::{SourceKind, SourceSpec};

/// Checks that a source URL is absolute http(s) before any request is made.
pub fn validate_source_url(raw: &str) -> Result<Url, HarvestError> {
    let invalid = |message: String| HarvestError::SourceUnavailable {
        url: raw.to_string(),
        kind: SourceFailure::InvalidUrl,
        message,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {:?}", other))),
    }
}

fn is_retriable(error: &HarvestError) -> bool {
    match error {
        HarvestError::SourceUnavailable { kind, .. } => kind.is_retriable(),
        _ => false,
    }
}

/// Retrieves the raw body of one source, retrying transient failures.
///
/// # Errors
///
/// Returns [`HarvestError::SourceUnavailable`] once retries are exhausted or
/// a permanent failure is hit. The failure kind is counted in `stats`.
pub async fn fetch_source(
    client: &reqwest::Client,
    spec: &SourceSpec,
    config: &Config,
    stats: &HarvestStats,
) -> Result<String, HarvestError> {
    if let Err(e) = validate_source_url(&spec.url) {
        stats.increment_source_failure(SourceFailure::InvalidUrl);
        return Err(e);
    }

    let render_timeout = Duration::from_secs(config.render_timeout_seconds);
    let ready = match spec.kind {
        SourceKind::Rendered => render::ready_selector(&config.render_wait),
        _ => config.render_wait.as_str(),
    };
    let mut attempt = 0usize;

    let result = RetryIf::spawn(
        get_retry_strategy(config.fetch_retries),
        || {
            attempt += 1;
            if attempt > 1 {
                debug!("Retrying {} (attempt {})", spec.url, attempt);
            }
            async move {
                match spec.kind {
                    SourceKind::Rendered => {
                        render::render_and_wait(&spec.url, ready, render_timeout)
                            .await
                    }
                    SourceKind::Html | SourceKind::Csv | SourceKind::Text => {
                        http::get_body(client, &spec.url).await
                    }
                }
            }
        },
        is_retriable,
    )
    .await;

    if let Err(HarvestError::SourceUnavailable { kind, .. }) = &result {
        stats.increment_source_failure(*kind);
    }
    result
}

/// Fetches a source and parses it into a [`Document`].
///
/// Failures are logged and counted; the caller moves on to the next source.
pub async fn fetch_document(
    client: &reqwest::Client,
    spec: &SourceSpec,
    config: &Config,
    stats: &HarvestStats,
) -> Option<Document> {
    match fetch_source(client, spec, config, stats).await {
        Ok(body) => Some(Document::parse(spec.url.clone(), spec.kind, body)),
        Err(e) => {
            warn!("Skipping source: {}", e);
            None
        }
    }
}
