//! Candidate validation and normalization.
//!
//! Turns a [`RawCandidate`] into a [`CandidateRecord`] or an
//! [`InvalidRecord`]. Policies applied here:
//! - malformed addresses are dropped
//! - absent or unparsable ports become [`DEFAULT_PORT`](crate::config::DEFAULT_PORT)
//! - unparsable latency becomes "unknown"
//! - a known latency above the configured threshold drops the record

mod address;
mod fields;

pub use address::{is_valid_address, is_valid_ipv4, is_valid_ipv6, split_address_port};
pub use fields::{parse_latency, parse_port};

use crate::config::Config;
use crate::error_handling::{DropReason, InvalidRecord};
use crate::models::{CandidateRecord, RawCandidate};
use crate::utils::{normalize_cell, sanitize_label};

/// Validates and normalizes raw candidates.
#[derive(Debug, Clone)]
pub struct Normalizer {
    default_label: String,
    max_latency_ms: Option<f64>,
}

impl Normalizer {
    pub fn new(default_label: impl Into<String>, max_latency_ms: Option<f64>) -> Self {
        let default_label = sanitize_label(&default_label.into());
        Self {
            default_label,
            max_latency_ms,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.default_label.clone(), config.max_latency_ms)
    }

    /// Validates one candidate.
    ///
    /// A port column wins over a port embedded in the address cell.
    pub fn normalize(&self, raw: &RawCandidate) -> Result<CandidateRecord, InvalidRecord> {
        let (address, embedded_port) = split_address_port(&raw.address_text);
        if !is_valid_address(address) {
            return Err(InvalidRecord::new(DropReason::InvalidAddress, address));
        }

        let port_text = raw
            .port_text
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .or(embedded_port);
        let port = parse_port(port_text)?;

        let latency_ms = parse_latency(raw.latency_text.as_deref());
        if let (Some(latency), Some(max)) = (latency_ms, self.max_latency_ms) {
            if latency > max {
                return Err(InvalidRecord::new(
                    DropReason::LatencyAboveThreshold,
                    format!("{}ms", latency),
                ));
            }
        }

        let label = match sanitize_label(&raw.label) {
            l if l.is_empty() => self.default_label.clone(),
            l => l,
        };

        Ok(CandidateRecord {
            address: address.to_string(),
            port,
            label,
            region_hint: normalize_cell(&raw.region_text),
            latency_ms,
        })
    }
}
