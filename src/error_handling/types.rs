//! Error type definitions.
//!
//! This module defines the failures a run can hit and the per-record
//! categories that are counted rather than raised.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Failures of a harvest run.
///
/// Only `InsufficientYield`, `NothingToWrite` and `Write` end a run;
/// `SourceUnavailable` and `StructureNotFound` are logged and the run moves
/// on to the next source or strategy.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// A source could not be fetched or rendered, even after retries.
    #[error("source {url} unavailable ({kind}): {message}")]
    SourceUnavailable {
        url: String,
        kind: SourceFailure,
        message: String,
    },

    /// No extraction strategy found anything in a fetched document.
    #[error("no candidate structure found in {url}")]
    StructureNotFound { url: String },

    /// Every fetch cycle came back with too few valid records.
    #[error("recovered {found} valid records after {cycles} cycles (minimum {required})")]
    InsufficientYield {
        found: usize,
        required: usize,
        cycles: usize,
    },

    /// Selection left nothing to write.
    #[error("no records survived selection; refusing to write an empty file")]
    NothingToWrite,

    /// The output file could not be written or replaced.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A candidate that failed validation. Dropped and counted, never logged as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}: {value:?}")]
pub struct InvalidRecord {
    pub reason: DropReason,
    pub value: String,
}

impl InvalidRecord {
    pub fn new(reason: DropReason, value: impl Into<String>) -> Self {
        Self {
            reason,
            value: value.into(),
        }
    }
}

/// Why a candidate did not make it into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum DropReason {
    /// Address is neither a dotted-quad IPv4 nor an 8-group IPv6
    InvalidAddress,
    /// Port is numeric but outside 1-65535
    PortOutOfRange,
    /// Measured latency above the configured threshold
    LatencyAboveThreshold,
    /// Same address:port already seen earlier in the run
    Duplicate,
    /// Country is in neither the preferred nor the fallback list
    OutsideRegions,
    /// Cut by the output cap
    OverCap,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::InvalidAddress => "Invalid address",
            DropReason::PortOutOfRange => "Port out of range",
            DropReason::LatencyAboveThreshold => "Latency above threshold",
            DropReason::Duplicate => "Duplicate address:port",
            DropReason::OutsideRegions => "Outside preferred/fallback regions",
            DropReason::OverCap => "Over output cap",
        }
    }
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories of source fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum SourceFailure {
    InvalidUrl,
    Timeout,
    Connect,
    TooManyRequests,
    ClientError,
    ServerError,
    Body,
    BodyTooLarge,
    Render,
    RenderUnsupported,
    Other,
}

impl SourceFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFailure::InvalidUrl => "Invalid source URL",
            SourceFailure::Timeout => "Request timeout",
            SourceFailure::Connect => "Connection error",
            SourceFailure::TooManyRequests => "Too many requests (429)",
            SourceFailure::ClientError => "Client error (4xx)",
            SourceFailure::ServerError => "Server error (5xx)",
            SourceFailure::Body => "Body read error",
            SourceFailure::BodyTooLarge => "Body too large",
            SourceFailure::Render => "Render error",
            SourceFailure::RenderUnsupported => "Rendering not compiled in",
            SourceFailure::Other => "Other error",
        }
    }

    /// Whether another attempt at the same source could succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            SourceFailure::Timeout
                | SourceFailure::Connect
                | SourceFailure::TooManyRequests
                | SourceFailure::ServerError
                | SourceFailure::Body
                | SourceFailure::Render
                | SourceFailure::Other
        )
    }
}

impl std::fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
