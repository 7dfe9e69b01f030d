//! CSS selector and regex compilation helpers for static patterns.

use regex::Regex;
use scraper::Selector;

/// Parses a CSS selector that must succeed (for compile-time constants).
///
/// # Panics
///
/// Panics if the selector cannot be parsed (indicates a programming error).
pub fn parse_selector_unsafe(selector_str: &str, context: &str) -> Selector {
    Selector::parse(selector_str).unwrap_or_else(|e| {
        panic!(
            "Failed to parse CSS selector '{}' in {}: {}. This is a programming error.",
            selector_str, context, e
        )
    })
}

/// Parses a user-supplied CSS selector.
///
/// If parsing fails, logs an error and returns `None` so the caller can
/// fall back to its default behaviour.
pub fn parse_selector_checked(selector_str: &str, context: &str) -> Option<Selector> {
    match Selector::parse(selector_str) {
        Ok(selector) => Some(selector),
        Err(e) => {
            log::error!(
                "Failed to parse CSS selector '{}' in {}: {}",
                selector_str,
                context,
                e
            );
            None
        }
    }
}

/// Compiles a static regex pattern, panicking with a detailed message if it is invalid.
pub fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector_checked() {
        assert!(parse_selector_checked("table tr + tr", "test").is_some());
        assert!(parse_selector_checked("div[", "test").is_none());
    }

    #[test]
    #[should_panic(expected = "programming error")]
    fn test_parse_selector_unsafe_panics() {
        parse_selector_unsafe("[[", "test");
    }
}
