//! Free-text address scanning, used when a document has no usable table.

use std::sync::LazyLock;

use regex::Regex;

use super::document::Document;
use super::{cap_rows, Candidates, ExtractionStrategy};
use crate::models::RawCandidate;
use crate::utils::compile_regex_unsafe;

// IPv6 first so its groups are not consumed as IPv4 fragments. The IPv4
// branch takes the whole run of digits and dots; its shape is checked after
// matching since the regex crate has no lookaround.
const ADDRESS_PATTERN: &str = r"(?x)
    (?:
        \[?(?P<v6>(?:[0-9A-Fa-f]{0,4}:){7}[0-9A-Fa-f]{0,4})\]?
      | (?P<v4>\d[\d.]*)
    )
    (?::(?P<port>\d+))?
";

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(ADDRESS_PATTERN, "ADDRESS_RE"));

/// Accepts a digit/dot run only when it is exactly four 1-3 digit groups.
///
/// A trailing sentence dot is tolerated; `10.0.0.1000` or `1.2.3.4.5` are
/// rejected whole rather than trimmed to a valid-looking prefix.
fn dotted_quad(token: &str) -> Option<&str> {
    let token = token.trim_end_matches('.');
    let parts: Vec<&str> = token.split('.').collect();
    let shaped = parts.len() == 4
        && parts
            .iter()
            .all(|part| (1..=3).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit()));
    shaped.then_some(token)
}

/// The match must not continue a larger token such as `v2.1.1.1.1` or `.1.2.3.4`.
fn starts_token(text: &str, start: usize) -> bool {
    !matches!(
        text[..start].chars().next_back(),
        Some(c) if c == '.' || c.is_ascii_alphanumeric()
    )
}

/// Scans the document text for address-like substrings.
///
/// Matches are only candidates; validation rejects out-of-range octets.
#[derive(Debug, Clone)]
pub struct FreeTextRegex {
    pub max_rows: usize,
}

impl ExtractionStrategy for FreeTextRegex {
    fn name(&self) -> &'static str {
        "free-text-regex"
    }

    fn extract<'a>(&'a self, document: &'a Document) -> Candidates<'a> {
        let text = document.text.as_str();
        let matches = ADDRESS_RE.captures_iter(text).filter_map(move |caps| {
            let whole = caps.get(0)?;
            if !starts_token(text, whole.start()) {
                return None;
            }
            let address = match (caps.name("v6"), caps.name("v4")) {
                // a run of bare colons is not an address
                (Some(v6), _) => Some(v6.as_str())
                    .filter(|a| a.bytes().any(|b| b.is_ascii_hexdigit()))?,
                (None, Some(v4)) => dotted_quad(v4.as_str())?,
                (None, None) => return None,
            };
            Some(RawCandidate {
                address_text: address.to_string(),
                port_text: caps.name("port").map(|m| m.as_str().to_string()),
                ..Default::default()
            })
        });
        cap_rows(matches, self.max_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceKind;

    fn scan(text: &str) -> Vec<RawCandidate> {
        let doc = Document::parse("mem", SourceKind::Text, text.to_string());
        FreeTextRegex { max_rows: 0 }.extract(&doc).collect()
    }

    #[test]
    fn test_scans_ipv4_with_and_without_port() {
        let found = scan("best: 104.16.1.1:2053, backup 172.64.0.9 (slow)");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].address_text, "104.16.1.1");
        assert_eq!(found[0].port_text.as_deref(), Some("2053"));
        assert_eq!(found[1].address_text, "172.64.0.9");
        assert_eq!(found[1].port_text, None);
        assert_eq!(found[1].label, "");
    }

    #[test]
    fn test_scans_ipv6() {
        let found = scan("v6 [2606:4700:0:0:0:0:6810:85e5]:443 end");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].address_text, "2606:4700:0:0:0:0:6810:85e5");
        assert_eq!(found[0].port_text.as_deref(), Some("443"));
    }

    #[test]
    fn test_out_of_range_octets_still_match() {
        // rejected later by validation
        let found = scan("999.1.1.1");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_respects_max_rows() {
        let text = (1..=20).map(|i| format!("10.0.0.{} ", i)).collect::<String>();
        let doc = Document::parse("mem", SourceKind::Text, text);
        assert_eq!(FreeTextRegex { max_rows: 5 }.extract(&doc).count(), 5);
    }

    #[test]
    fn test_overlong_dotted_runs_are_rejected_whole() {
        let found = scan("build 10.0.0.1000 and id 1234.5.6.7 and version 1.2.3.4.5");
        assert!(found.is_empty(), "unexpected candidates: {:?}", found);
    }

    #[test]
    fn test_trailing_sentence_dot_is_tolerated() {
        let found = scan("Use 104.16.1.1. Backup: v2.1.1.1.1 and .8.8.8.8");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].address_text, "104.16.1.1");
    }

    #[test]
    fn test_bare_colon_run_is_not_ipv6() {
        assert!(scan("separator ::::::: here").is_empty());
        assert!(scan("[:::::::]:443").is_empty());
    }

    #[test]
    fn test_dotted_quad_shape() {
        assert_eq!(dotted_quad("1.2.3.4"), Some("1.2.3.4"));
        assert_eq!(dotted_quad("1.2.3.4."), Some("1.2.3.4"));
        assert_eq!(dotted_quad("1.2.3"), None);
        assert_eq!(dotted_quad("1..2.3"), None);
        assert_eq!(dotted_quad("1000.2.3.4"), None);
    }

    #[test]
    fn test_no_addresses() {
        assert!(scan("nothing to see here, version 1.2.3").is_empty());
    }
}
