//! Port and latency field parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::DEFAULT_PORT;
use crate::error_handling::{DropReason, InvalidRecord};
use crate::utils::compile_regex_unsafe;

// number, optional unit; units are case-insensitive
const LATENCY_PATTERN: &str = r"(?i)^\s*(\d+(?:\.\d+)?)\s*(ms|msec|s|sec|毫秒|秒)?\s*$";

static LATENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(LATENCY_PATTERN, "LATENCY_RE"));

/// Parses a port field.
///
/// - absent, empty or non-numeric text falls back to [`DEFAULT_PORT`]
/// - a number in 1-65535 is accepted
/// - any other number (0, 70000, ...) rejects the record
pub fn parse_port(text: Option<&str>) -> Result<u16, InvalidRecord> {
    let text = match text.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(DEFAULT_PORT),
    };

    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(DEFAULT_PORT);
    }

    match text.parse::<u32>() {
        Ok(port) if (1..=65535).contains(&port) => Ok(port as u16),
        _ => Err(InvalidRecord::new(DropReason::PortOutOfRange, text)),
    }
}

/// Parses a latency field into milliseconds.
///
/// Accepts a number with an optional `ms`/`s` unit (seconds are converted).
/// Anything else is reported as unknown (`None`), never as an error.
pub fn parse_latency(text: Option<&str>) -> Option<f64> {
    let caps = LATENCY_RE.captures(text?)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2).map(|m| m.as_str().to_ascii_lowercase());

    let millis = match unit.as_deref() {
        Some("s") | Some("sec") | Some("秒") => value * 1000.0,
        _ => value,
    };
    millis.is_finite().then_some(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port_defaults() {
        assert_eq!(parse_port(None), Ok(443));
        assert_eq!(parse_port(Some("")), Ok(443));
        assert_eq!(parse_port(Some("   ")), Ok(443));
        assert_eq!(parse_port(Some("https")), Ok(443));
        assert_eq!(parse_port(Some("80a")), Ok(443));
    }

    #[test]
    fn test_parse_port_accepts_range() {
        assert_eq!(parse_port(Some("1")), Ok(1));
        assert_eq!(parse_port(Some(" 2053 ")), Ok(2053));
        assert_eq!(parse_port(Some("65535")), Ok(65535));
    }

    #[test]
    fn test_parse_port_rejects_out_of_range() {
        for bad in ["0", "65536", "70000", "99999999999999"] {
            let err = parse_port(Some(bad)).unwrap_err();
            assert_eq!(err.reason, DropReason::PortOutOfRange, "{}", bad);
        }
    }

    #[test]
    fn test_parse_latency_units() {
        assert_eq!(parse_latency(Some("123")), Some(123.0));
        assert_eq!(parse_latency(Some("45.5ms")), Some(45.5));
        assert_eq!(parse_latency(Some(" 80 MS ")), Some(80.0));
        assert_eq!(parse_latency(Some("1.5s")), Some(1500.0));
        assert_eq!(parse_latency(Some("200毫秒")), Some(200.0));
    }

    #[test]
    fn test_parse_latency_unknown() {
        assert_eq!(parse_latency(None), None);
        assert_eq!(parse_latency(Some("")), None);
        assert_eq!(parse_latency(Some("timeout")), None);
        assert_eq!(parse_latency(Some("-5ms")), None);
        assert_eq!(parse_latency(Some("12 parsecs")), None);
    }
}
