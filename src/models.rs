//! Record types flowing through the pipeline.

use std::fmt;

use crate::geoip::GeoTierKind;

/// Kind of document a source serves, which decides how it is fetched and
/// which extraction strategies apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Static HTML fetched over HTTP
    Html,
    /// HTML that only contains the data after script execution
    Rendered,
    /// Delimited text feed
    Csv,
    /// Arbitrary text scanned for addresses
    Text,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Html => "html",
            SourceKind::Rendered => "rendered",
            SourceKind::Csv => "csv",
            SourceKind::Text => "text",
        })
    }
}

/// One configured source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub url: String,
    pub kind: SourceKind,
}

/// A candidate as found in a document, before validation.
///
/// All fields are the raw cell (or match) text; nothing has been checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCandidate {
    pub label: String,
    pub address_text: String,
    pub port_text: Option<String>,
    pub region_text: String,
    pub latency_text: Option<String>,
}

/// A validated candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    /// Literal IPv4 or IPv6 address
    pub address: String,
    pub port: u16,
    pub label: String,
    /// Site-specific region code or country name, possibly empty
    pub region_hint: String,
    /// Measured latency in milliseconds, if the source reported one
    pub latency_ms: Option<f64>,
}

impl CandidateRecord {
    /// The `(address, port)` identity of the record.
    pub fn key(&self) -> (&str, u16) {
        (self.address.as_str(), self.port)
    }
}

/// A candidate enriched with its country tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecord {
    pub record: CandidateRecord,
    /// ISO country code, or `UNKNOWN`
    pub country: String,
    /// Tier that produced the code; `None` when every tier came back empty
    pub resolved_by: Option<GeoTierKind>,
}

impl ResolvedRecord {
    pub fn key(&self) -> (&str, u16) {
        self.record.key()
    }

    pub fn latency_ms(&self) -> Option<f64> {
        self.record.latency_ms
    }
}
