//! Error categorization and retry strategy.
//!
//! This module provides functions to categorize fetch errors and configure retry strategies.

use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

use super::types::SourceFailure;
use crate::config::{HTTP_STATUS_TOO_MANY_REQUESTS, RETRY_BASE_DELAY_MS, RETRY_MAX_DELAY_SECS};

/// Creates an exponential backoff retry strategy.
///
/// Yields `retries` delays: `RETRY_BASE_DELAY_MS * 2`, `* 4`, `* 8`, ... capped at
/// `RETRY_MAX_DELAY_SECS`. The total number of attempts made by
/// `tokio_retry::RetryIf` is therefore `retries + 1`.
pub fn get_retry_strategy(retries: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(RETRY_BASE_DELAY_MS)
        .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
        .take(retries)
}

/// Categorizes a non-success HTTP status code.
pub fn categorize_status(status: reqwest::StatusCode) -> SourceFailure {
    if status.as_u16() == HTTP_STATUS_TOO_MANY_REQUESTS {
        SourceFailure::TooManyRequests
    } else if status.is_client_error() {
        SourceFailure::ClientError
    } else if status.is_server_error() {
        SourceFailure::ServerError
    } else {
        SourceFailure::Other
    }
}

/// Categorizes a `reqwest::Error` into a `SourceFailure`.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> SourceFailure {
    if let Some(status) = error.status() {
        return categorize_status(status);
    }

    if error.is_timeout() {
        SourceFailure::Timeout
    } else if error.is_connect() {
        SourceFailure::Connect
    } else if error.is_body() || error.is_decode() {
        SourceFailure::Body
    } else {
        SourceFailure::Other
    }
}
