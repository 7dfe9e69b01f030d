//! Utility functions shared across the pipeline.
//!
//! This module provides:
//! - Label and cell text sanitization
//! - CSS selector and regex helpers for static patterns

pub mod sanitize;
mod selector;

pub use sanitize::{normalize_cell, sanitize_label};
pub use selector::{compile_regex_unsafe, parse_selector_checked, parse_selector_unsafe};
