//! Single-attempt HTTP retrieval.

use log::debug;

use crate::config::MAX_RESPONSE_BODY_SIZE;
use crate::error_handling::{categorize_reqwest_error, categorize_status, HarvestError, SourceFailure};

fn unavailable(url: &str, kind: SourceFailure, message: impl Into<String>) -> HarvestError {
    HarvestError::SourceUnavailable {
        url: url.to_string(),
        kind,
        message: message.into(),
    }
}

/// Fetches `url` once and returns the decoded body.
///
/// Non-success statuses, oversized bodies and transport errors are all
/// mapped to [`HarvestError::SourceUnavailable`] with a categorized kind.
pub(crate) async fn get_body(client: &reqwest::Client, url: &str) -> Result<String, HarvestError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| unavailable(url, categorize_reqwest_error(&e), e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(unavailable(url, categorize_status(status), format!("HTTP {}", status)));
    }

    if let Some(length) = response.content_length() {
        if length as usize > MAX_RESPONSE_BODY_SIZE {
            return Err(unavailable(
                url,
                SourceFailure::BodyTooLarge,
                format!("declared {} bytes", length),
            ));
        }
    }

    // reqwest decodes using the charset in Content-Type, falling back to UTF-8
    let body = response
        .text()
        .await
        .map_err(|e| unavailable(url, categorize_reqwest_error(&e), e.to_string()))?;

    if body.len() > MAX_RESPONSE_BODY_SIZE {
        return Err(unavailable(
            url,
            SourceFailure::BodyTooLarge,
            format!("{} bytes", body.len()),
        ));
    }

    debug!("Fetched {} ({} bytes)", url, body.len());
    Ok(body)
}
