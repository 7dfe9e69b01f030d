//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::*;
use crate::extract::PositionalLayout;
use crate::models::{SourceKind, SourceSpec};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Parses a `CODE=CC` region mapping given on the command line.
pub fn parse_region_mapping(s: &str) -> Result<(String, String), String> {
    let (code, country) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid region mapping '{}': expected CODE=CC", s))?;
    let code = code.trim();
    let country = country.trim();
    if code.is_empty() || country.is_empty() {
        return Err(format!(
            "invalid region mapping '{}': code and country must be non-empty",
            s
        ));
    }
    Ok((code.to_string(), country.to_ascii_uppercase()))
}

/// Run configuration.
///
/// Built from the command line by the binary, or constructed directly with
/// `..Default::default()` when the crate is used as a library.
///
/// # Examples
///
/// ```no_run
/// use edge_harvest::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     csv_sources: vec!["https://example.com/result.csv".to_string()],
///     output: PathBuf::from("ip.txt"),
///     preferred_regions: vec!["JP".into(), "SG".into(), "HK".into()],
///     fallback_regions: vec!["US".into()],
///     max_output: 8,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "edge_harvest",
    version,
    about = "Scrapes edge IP:port candidates, tags them with a country code and writes ADDRESS:PORT#LABEL-CC lines."
)]
pub struct Config {
    /// Static HTML page to scrape (repeatable)
    #[arg(long = "source", value_name = "URL")]
    pub sources: Vec<String>,

    /// Page that needs script execution before scraping (repeatable, needs the `browser` feature)
    #[arg(long = "render-source", value_name = "URL")]
    pub render_sources: Vec<String>,

    /// Delimited (CSV) feed to read (repeatable)
    #[arg(long = "csv-source", value_name = "URL")]
    pub csv_sources: Vec<String>,

    /// Plain text document scanned for IP addresses (repeatable)
    #[arg(long = "text-source", value_name = "URL")]
    pub text_sources: Vec<String>,

    /// Output file, fully replaced on every successful run
    #[arg(short, long, env = "EDGE_HARVEST_OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Rows (or text matches) considered per source; 0 means no limit
    #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
    pub max_rows: usize,

    /// Records written at most; 0 means no limit
    #[arg(long, default_value_t = 0)]
    pub max_output: usize,

    /// Valid records a fetch cycle must recover before the run proceeds
    #[arg(long, default_value_t = DEFAULT_MIN_YIELD)]
    pub min_yield: usize,

    /// Fetch cycles attempted before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_CYCLES)]
    pub max_cycles: usize,

    /// Pause between fetch cycles in seconds (multiplied by the cycle number)
    #[arg(long, default_value_t = DEFAULT_CYCLE_BACKOFF_SECS)]
    pub cycle_backoff_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Retries after a failed fetch before a source is skipped
    #[arg(long, default_value_t = DEFAULT_FETCH_RETRIES)]
    pub fetch_retries: usize,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// MaxMind country database (.mmdb); the local tier is skipped if it cannot be read
    #[arg(long, env = "EDGE_HARVEST_GEOIP_DB", default_value = DEFAULT_GEOIP_DB)]
    pub geoip_db: PathBuf,

    /// Remote lookup URL template; `{ip}` is replaced by the address
    #[arg(long, default_value = DEFAULT_REMOTE_GEO_URL)]
    pub remote_geo_url: String,

    /// JSON field of the remote response holding the country code
    #[arg(long, default_value = DEFAULT_REMOTE_GEO_FIELD)]
    pub remote_geo_field: String,

    /// Disable the remote lookup tier
    #[arg(long)]
    pub no_remote_geo: bool,

    /// Retries per remote lookup
    #[arg(long, default_value_t = DEFAULT_REMOTE_GEO_RETRIES)]
    pub remote_geo_retries: usize,

    /// Timeout per remote lookup attempt in milliseconds
    #[arg(long, default_value_t = DEFAULT_REMOTE_GEO_TIMEOUT_MS)]
    pub remote_geo_timeout_ms: u64,

    /// Minimum spacing between remote lookups in milliseconds
    #[arg(long, default_value_t = DEFAULT_REMOTE_GEO_INTERVAL_MS)]
    pub remote_geo_interval_ms: u64,

    /// Extra region hint mapping, e.g. `--region-map HKG=HK` (repeatable)
    #[arg(long = "region-map", value_name = "CODE=CC", value_parser = parse_region_mapping)]
    pub region_map: Vec<(String, String)>,

    /// Country codes written first (comma separated or repeatable)
    #[arg(long = "preferred-region", value_name = "CC", value_delimiter = ',')]
    pub preferred_regions: Vec<String>,

    /// Country codes used to pad the output when preferred records run short
    #[arg(long = "fallback-region", value_name = "CC", value_delimiter = ',')]
    pub fallback_regions: Vec<String>,

    /// Drop records whose measured latency exceeds this many milliseconds
    #[arg(long)]
    pub max_latency_ms: Option<f64>,

    /// Minimum cells per row for positional extraction
    #[arg(long, default_value_t = DEFAULT_MIN_COLUMNS)]
    pub min_columns: usize,

    /// Column holding the line/site label (positional layout)
    #[arg(long, default_value_t = DEFAULT_LABEL_COLUMN)]
    pub label_column: usize,

    /// Column holding the address (positional layout)
    #[arg(long, default_value_t = DEFAULT_ADDRESS_COLUMN)]
    pub address_column: usize,

    /// Column holding the region hint (positional layout)
    #[arg(long, default_value_t = DEFAULT_REGION_COLUMN)]
    pub region_column: usize,

    /// Column holding the port (positional layout)
    #[arg(long)]
    pub port_column: Option<usize>,

    /// Column holding the latency (positional layout)
    #[arg(long)]
    pub latency_column: Option<usize>,

    /// Label written when a row has none
    #[arg(long, default_value = DEFAULT_LABEL)]
    pub default_label: String,

    /// CSS selector a rendered page must match before its DOM is captured
    #[arg(long, default_value = DEFAULT_RENDER_WAIT_SELECTOR)]
    pub render_wait: String,

    /// Seconds to wait for a rendered page to become ready
    #[arg(long, default_value_t = DEFAULT_RENDER_TIMEOUT_SECS)]
    pub render_timeout_seconds: u64,
}

impl Config {
    /// All configured sources in fetch order (HTML, rendered, CSV, text).
    ///
    /// Falls back to the built-in HTML source when nothing was configured.
    pub fn source_specs(&self) -> Vec<SourceSpec> {
        let groups = [
            (SourceKind::Html, &self.sources),
            (SourceKind::Rendered, &self.render_sources),
            (SourceKind::Csv, &self.csv_sources),
            (SourceKind::Text, &self.text_sources),
        ];
        let specs: Vec<SourceSpec> = groups
            .into_iter()
            .flat_map(|(kind, urls)| {
                urls.iter().map(move |url| SourceSpec {
                    url: url.clone(),
                    kind,
                })
            })
            .collect();

        if specs.is_empty() {
            vec![SourceSpec {
                url: DEFAULT_SOURCE_URL.to_string(),
                kind: SourceKind::Html,
            }]
        } else {
            specs
        }
    }

    /// Column layout used when a table or feed has no recognisable header.
    pub fn positional_layout(&self) -> PositionalLayout {
        PositionalLayout {
            label: self.label_column,
            address: self.address_column,
            region: Some(self.region_column),
            port: self.port_column,
            latency: self.latency_column,
            min_columns: self.min_columns,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            render_sources: Vec::new(),
            csv_sources: Vec::new(),
            text_sources: Vec::new(),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            max_rows: DEFAULT_MAX_ROWS,
            max_output: 0,
            min_yield: DEFAULT_MIN_YIELD,
            max_cycles: DEFAULT_MAX_CYCLES,
            cycle_backoff_secs: DEFAULT_CYCLE_BACKOFF_SECS,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            fetch_retries: DEFAULT_FETCH_RETRIES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            geoip_db: PathBuf::from(DEFAULT_GEOIP_DB),
            remote_geo_url: DEFAULT_REMOTE_GEO_URL.to_string(),
            remote_geo_field: DEFAULT_REMOTE_GEO_FIELD.to_string(),
            no_remote_geo: false,
            remote_geo_retries: DEFAULT_REMOTE_GEO_RETRIES,
            remote_geo_timeout_ms: DEFAULT_REMOTE_GEO_TIMEOUT_MS,
            remote_geo_interval_ms: DEFAULT_REMOTE_GEO_INTERVAL_MS,
            region_map: Vec::new(),
            preferred_regions: Vec::new(),
            fallback_regions: Vec::new(),
            max_latency_ms: None,
            min_columns: DEFAULT_MIN_COLUMNS,
            label_column: DEFAULT_LABEL_COLUMN,
            address_column: DEFAULT_ADDRESS_COLUMN,
            region_column: DEFAULT_REGION_COLUMN,
            port_column: None,
            latency_column: None,
            default_label: DEFAULT_LABEL.to_string(),
            render_wait: DEFAULT_RENDER_WAIT_SELECTOR.to_string(),
            render_timeout_seconds: DEFAULT_RENDER_TIMEOUT_SECS,
        }
    }
}
