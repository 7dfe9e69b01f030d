//! Error handling and run statistics.
//!
//! This module provides:
//! - Error type definitions (`HarvestError`, `InvalidRecord`, `InitializationError`)
//! - Per-run counters for dropped candidates, source failures and geo outcomes
//! - Retry strategy configuration and fetch error categorization

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, categorize_status, get_retry_strategy};
pub use stats::HarvestStats;
pub use types::{DropReason, HarvestError, InitializationError, InvalidRecord, SourceFailure};
