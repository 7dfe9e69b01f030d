//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults, fixed pipeline policies)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{parse_region_mapping, Config, LogFormat, LogLevel};
