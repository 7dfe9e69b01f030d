//! Configuration constants.
//!
//! Defaults for every tunable in [`Config`](super::Config) plus the fixed
//! policy values of the reconciliation pipeline.

/// Port assigned to a record whose port is absent or unparsable.
///
/// Downstream consumers rely on this default, so unparsable ports are
/// silently rewritten to it rather than rejected.
pub const DEFAULT_PORT: u16 = 443;

/// Country tag used when every geo tier came back empty.
pub const UNKNOWN_COUNTRY: &str = "UNKNOWN";

/// Label used when a row carries no line/site name.
pub const DEFAULT_LABEL: &str = "Unknown";

/// Output file written by a run.
pub const DEFAULT_OUTPUT_FILE: &str = "ip.txt";

/// Source page used when no source is configured.
pub const DEFAULT_SOURCE_URL: &str = "https://cf.vvhan.com/";

/// Local MaxMind country database.
pub const DEFAULT_GEOIP_DB: &str = "GeoLite2-Country.mmdb";

/// Maximum number of table rows or text matches considered per source.
pub const DEFAULT_MAX_ROWS: usize = 50;

/// Minimum number of cells a row needs for positional extraction.
pub const DEFAULT_MIN_COLUMNS: usize = 2;

// Positional layout used when a table has no recognisable header
pub const DEFAULT_LABEL_COLUMN: usize = 0;
pub const DEFAULT_ADDRESS_COLUMN: usize = 1;
pub const DEFAULT_REGION_COLUMN: usize = 4;

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// `Accept-Language` sent with every page fetch.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// `Referer` sent with every page fetch.
pub const DEFAULT_REFERER: &str = "https://www.google.com/";

/// Per-request timeout for page and feed fetches, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Retries after the first failed fetch of a source.
pub const DEFAULT_FETCH_RETRIES: usize = 3;

/// Maximum response body size in bytes (5MB).
/// Larger bodies are rejected rather than parsed.
pub const MAX_RESPONSE_BODY_SIZE: usize = 5 * 1024 * 1024;

// Retry backoff: delays are RETRY_BASE_DELAY_MS * 2^n, capped at RETRY_MAX_DELAY_SECS
pub const RETRY_BASE_DELAY_MS: u64 = 250;
pub const RETRY_MAX_DELAY_SECS: u64 = 10;

/// HTTP status code for "Too Many Requests" (rate limiting)
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Placeholder replaced by the address in the remote lookup URL template.
pub const REMOTE_GEO_IP_PLACEHOLDER: &str = "{ip}";

/// Remote country lookup endpoint.
pub const DEFAULT_REMOTE_GEO_URL: &str = "http://ip-api.com/json/{ip}?fields=status,countryCode";

/// JSON field holding the ISO country code in the remote response.
pub const DEFAULT_REMOTE_GEO_FIELD: &str = "countryCode";

pub const DEFAULT_REMOTE_GEO_RETRIES: usize = 2;
pub const DEFAULT_REMOTE_GEO_TIMEOUT_MS: u64 = 3000;

/// Minimum spacing between two remote lookups.
/// ip-api.com allows 45 requests per minute on the free tier.
pub const DEFAULT_REMOTE_GEO_INTERVAL_MS: u64 = 1400;

/// Selector that must match before a rendered page is considered ready:
/// a table with at least one data row after the header.
pub const DEFAULT_RENDER_WAIT_SELECTOR: &str = "table tr + tr";

pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 30;

/// Minimum number of valid records a fetch cycle must recover.
pub const DEFAULT_MIN_YIELD: usize = 1;

/// Full fetch cycles attempted before giving up.
pub const DEFAULT_MAX_CYCLES: usize = 3;

/// Pause between fetch cycles, multiplied by the cycle number.
pub const DEFAULT_CYCLE_BACKOFF_SECS: u64 = 5;
