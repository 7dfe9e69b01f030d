//! Static region-hint table: the last-resort geo tier.
//!
//! Sources often label rows with a data-center code (IATA airport code) or
//! a country name. Those are mapped to ISO country codes here.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{is_iso_code, GeoTier, GeoTierKind};
use crate::models::CandidateRecord;

/// Built-in hint → ISO code table. Keys are matched case-insensitively.
///
/// `SEA` maps to `SG`: the sites this was built for use it for Southeast Asia.
const REGION_TABLE: &[(&str, &str)] = &[
    // data-center codes
    ("SEA", "SG"),
    ("SIN", "SG"),
    ("NRT", "JP"),
    ("HND", "JP"),
    ("KIX", "JP"),
    ("ICN", "KR"),
    ("HKG", "HK"),
    ("TPE", "TW"),
    ("KHH", "TW"),
    ("BKK", "TH"),
    ("KUL", "MY"),
    ("MNL", "PH"),
    ("CGK", "ID"),
    ("SGN", "VN"),
    ("HAN", "VN"),
    ("BOM", "IN"),
    ("DEL", "IN"),
    ("MAA", "IN"),
    ("SYD", "AU"),
    ("MEL", "AU"),
    ("AKL", "NZ"),
    ("LAX", "US"),
    ("SJC", "US"),
    ("SFO", "US"),
    ("IAD", "US"),
    ("EWR", "US"),
    ("JFK", "US"),
    ("ORD", "US"),
    ("DFW", "US"),
    ("ATL", "US"),
    ("MIA", "US"),
    ("DEN", "US"),
    ("PDX", "US"),
    ("PHX", "US"),
    ("BOS", "US"),
    ("YYZ", "CA"),
    ("YVR", "CA"),
    ("GRU", "BR"),
    ("FRA", "DE"),
    ("MUC", "DE"),
    ("AMS", "NL"),
    ("LHR", "GB"),
    ("MAN", "GB"),
    ("CDG", "FR"),
    ("MRS", "FR"),
    ("MAD", "ES"),
    ("MXP", "IT"),
    ("ZRH", "CH"),
    ("VIE", "AT"),
    ("WAW", "PL"),
    ("ARN", "SE"),
    ("CPH", "DK"),
    ("HEL", "FI"),
    ("OSL", "NO"),
    ("DUB", "IE"),
    ("BRU", "BE"),
    ("PRG", "CZ"),
    ("IST", "TR"),
    ("DXB", "AE"),
    ("TLV", "IL"),
    ("JNB", "ZA"),
    // country and region names
    ("SINGAPORE", "SG"),
    ("JAPAN", "JP"),
    ("KOREA", "KR"),
    ("SOUTH KOREA", "KR"),
    ("HONG KONG", "HK"),
    ("TAIWAN", "TW"),
    ("UNITED STATES", "US"),
    ("USA", "US"),
    ("GERMANY", "DE"),
    ("NETHERLANDS", "NL"),
    ("UNITED KINGDOM", "GB"),
    ("FRANCE", "FR"),
    ("CANADA", "CA"),
    ("AUSTRALIA", "AU"),
    ("INDIA", "IN"),
    ("新加坡", "SG"),
    ("日本", "JP"),
    ("韩国", "KR"),
    ("香港", "HK"),
    ("台湾", "TW"),
    ("美国", "US"),
    ("德国", "DE"),
    ("荷兰", "NL"),
    ("英国", "GB"),
    ("法国", "FR"),
    ("加拿大", "CA"),
    ("澳大利亚", "AU"),
    ("印度", "IN"),
];

fn normalize_key(hint: &str) -> String {
    hint.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Maps region hints to ISO codes.
#[derive(Debug, Clone)]
pub struct RegionHint {
    table: HashMap<String, String>,
}

impl RegionHint {
    /// Builds the table; `overrides` (`CODE`, `CC`) replace built-in entries.
    pub fn new(overrides: &[(String, String)]) -> Self {
        let mut table: HashMap<String, String> = REGION_TABLE
            .iter()
            .map(|(hint, code)| (hint.to_string(), code.to_string()))
            .collect();
        for (hint, code) in overrides {
            table.insert(normalize_key(hint), code.to_ascii_uppercase());
        }
        Self { table }
    }

    /// Looks up a hint. Unknown two-letter alphabetic hints are taken as ISO codes.
    pub fn lookup(&self, hint: &str) -> Option<String> {
        let key = normalize_key(hint);
        if key.is_empty() {
            return None;
        }
        if let Some(code) = self.table.get(&key) {
            return Some(code.clone());
        }
        is_iso_code(&key).then_some(key)
    }
}

impl Default for RegionHint {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[async_trait]
impl GeoTier for RegionHint {
    fn kind(&self) -> GeoTierKind {
        GeoTierKind::RegionHint
    }

    async fn resolve(&self, record: &CandidateRecord) -> Option<String> {
        self.lookup(&record.region_hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_codes() {
        let hints = RegionHint::default();
        assert_eq!(hints.lookup("SEA"), Some("SG".to_string()));
        assert_eq!(hints.lookup("nrt"), Some("JP".to_string()));
        assert_eq!(hints.lookup(" Lax "), Some("US".to_string()));
        assert_eq!(hints.lookup("FRA"), Some("DE".to_string()));
        assert_eq!(hints.lookup("AMS"), Some("NL".to_string()));
        assert_eq!(hints.lookup("IAD"), Some("US".to_string()));
        assert_eq!(hints.lookup("SJC"), Some("US".to_string()));
    }

    #[test]
    fn test_country_names() {
        let hints = RegionHint::default();
        assert_eq!(hints.lookup("Hong  Kong"), Some("HK".to_string()));
        assert_eq!(hints.lookup("新加坡"), Some("SG".to_string()));
    }

    #[test]
    fn test_two_letter_fallback() {
        let hints = RegionHint::default();
        assert_eq!(hints.lookup("de"), Some("DE".to_string()));
        assert_eq!(hints.lookup("D1"), None);
        assert_eq!(hints.lookup("XYZ"), None);
        assert_eq!(hints.lookup(""), None);
    }

    #[test]
    fn test_overrides_replace_builtin() {
        let hints = RegionHint::new(&[
            ("sea".to_string(), "us".to_string()),
            ("XYZ".to_string(), "FR".to_string()),
        ]);
        assert_eq!(hints.lookup("SEA"), Some("US".to_string()));
        assert_eq!(hints.lookup("xyz"), Some("FR".to_string()));
    }
}
