//! Deduplication, ordering and preferred-region selection.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::config::Config;
use crate::error_handling::{DropReason, HarvestStats};
use crate::models::{CandidateRecord, ResolvedRecord};

/// Keeps the first occurrence of each `(address, port)` pair.
pub fn dedup_first(records: Vec<CandidateRecord>, stats: &HarvestStats) -> Vec<CandidateRecord> {
    let mut seen: HashSet<(String, u16)> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| {
            let fresh = seen.insert((record.address.clone(), record.port));
            if !fresh {
                stats.increment_drop(DropReason::Duplicate);
            }
            fresh
        })
        .collect()
}

/// Known latency ascending, unknown latency last.
fn latency_order(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by latency.
pub fn sort_by_latency(records: &mut [ResolvedRecord]) {
    records.sort_by(|a, b| latency_order(a.latency_ms(), b.latency_ms()));
}

/// Country-based selection policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionPolicy {
    /// Codes emitted first; empty disables partitioning
    pub preferred: Vec<String>,
    /// Codes used to pad a short preferred set; empty means "anything else"
    pub fallback: Vec<String>,
    /// 0 means unlimited
    pub max_output: usize,
}

impl RegionPolicy {
    pub fn from_config(config: &Config) -> Self {
        let upper = |codes: &[String]| -> Vec<String> {
            codes
                .iter()
                .map(|c| c.trim().to_ascii_uppercase())
                .filter(|c| !c.is_empty())
                .collect()
        };
        Self {
            preferred: upper(&config.preferred_regions),
            fallback: upper(&config.fallback_regions),
            max_output: config.max_output,
        }
    }

    fn is_preferred(&self, country: &str) -> bool {
        self.preferred.iter().any(|c| c == country)
    }

    fn is_fallback(&self, country: &str) -> bool {
        self.fallback.is_empty() || self.fallback.iter().any(|c| c == country)
    }

    /// Orders and caps latency-sorted records.
    ///
    /// Preferred records come first; fallback records only fill the space
    /// left under `max_output`. Records in neither list are dropped when an
    /// explicit fallback list is configured.
    pub fn apply(&self, sorted: Vec<ResolvedRecord>, stats: &HarvestStats) -> Vec<ResolvedRecord> {
        let mut selected = if self.preferred.is_empty() {
            sorted
        } else {
            let (preferred, rest): (Vec<_>, Vec<_>) = sorted
                .into_iter()
                .partition(|r| self.is_preferred(&r.country));
            let (fallback, outside): (Vec<_>, Vec<_>) =
                rest.into_iter().partition(|r| self.is_fallback(&r.country));
            stats.add_drops(DropReason::OutsideRegions, outside.len());

            let mut selected = preferred;
            selected.extend(fallback);
            selected
        };

        if self.max_output > 0 && selected.len() > self.max_output {
            stats.add_drops(DropReason::OverCap, selected.len() - self.max_output);
            selected.truncate(self.max_output);
        }
        selected
    }
}

/// Sorts resolved records and applies the region policy.
pub fn select(
    mut records: Vec<ResolvedRecord>,
    policy: &RegionPolicy,
    stats: &HarvestStats,
) -> Vec<ResolvedRecord> {
    sort_by_latency(&mut records);
    policy.apply(records, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(address: &str, port: u16, latency_ms: Option<f64>) -> CandidateRecord {
        CandidateRecord {
            address: address.to_string(),
            port,
            label: "line".to_string(),
            region_hint: String::new(),
            latency_ms,
        }
    }

    fn resolved(address: &str, country: &str, latency_ms: Option<f64>) -> ResolvedRecord {
        ResolvedRecord {
            record: candidate(address, 443, latency_ms),
            country: country.to_string(),
            resolved_by: None,
        }
    }

    fn addresses(records: &[ResolvedRecord]) -> Vec<&str> {
        records.iter().map(|r| r.record.address.as_str()).collect()
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let stats = HarvestStats::new();
        let records = vec![
            candidate("1.1.1.1", 443, Some(50.0)),
            candidate("1.1.1.1", 2053, Some(60.0)),
            candidate("1.1.1.1", 443, Some(10.0)),
        ];
        let kept = dedup_first(records, &stats);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].latency_ms, Some(50.0));
        assert_eq!(stats.get_drop_count(DropReason::Duplicate), 1);
    }

    #[test]
    fn test_sort_unknown_latency_last_and_stable() {
        let mut records = vec![
            resolved("a", "US", None),
            resolved("b", "US", Some(120.0)),
            resolved("c", "US", Some(80.0)),
            resolved("d", "US", None),
            resolved("e", "US", Some(80.0)),
        ];
        sort_by_latency(&mut records);
        assert_eq!(addresses(&records), vec!["c", "e", "b", "a", "d"]);
    }

    #[test]
    fn test_preferred_padded_with_lowest_latency_fallback() {
        let stats = HarvestStats::new();
        let mut records = Vec::new();
        for i in 0..5 {
            records.push(resolved(&format!("10.0.0.{}", i), "US", Some(200.0 + i as f64)));
        }
        for i in 0..10 {
            records.push(resolved(&format!("10.0.1.{}", i), "JP", Some(100.0 - i as f64)));
        }
        let policy = RegionPolicy {
            preferred: vec!["US".to_string()],
            fallback: vec!["JP".to_string()],
            max_output: 8,
        };

        let selected = select(records, &policy, &stats);
        assert_eq!(selected.len(), 8);
        assert!(selected[..5].iter().all(|r| r.country == "US"));
        assert_eq!(
            addresses(&selected[5..]),
            vec!["10.0.1.9", "10.0.1.8", "10.0.1.7"]
        );
        assert_eq!(stats.get_drop_count(DropReason::OverCap), 7);
    }

    #[test]
    fn test_explicit_fallback_drops_other_regions() {
        let stats = HarvestStats::new();
        let records = vec![
            resolved("a", "US", Some(1.0)),
            resolved("b", "DE", Some(2.0)),
            resolved("c", "JP", Some(3.0)),
        ];
        let policy = RegionPolicy {
            preferred: vec!["JP".to_string()],
            fallback: vec!["US".to_string()],
            max_output: 0,
        };
        let selected = select(records, &policy, &stats);
        assert_eq!(addresses(&selected), vec!["c", "a"]);
        assert_eq!(stats.get_drop_count(DropReason::OutsideRegions), 1);
    }

    #[test]
    fn test_empty_fallback_keeps_everything() {
        let stats = HarvestStats::new();
        let records = vec![
            resolved("a", "US", Some(1.0)),
            resolved("b", "UNKNOWN", None),
            resolved("c", "JP", Some(3.0)),
        ];
        let policy = RegionPolicy {
            preferred: vec!["JP".to_string()],
            fallback: Vec::new(),
            max_output: 0,
        };
        assert_eq!(addresses(&select(records, &policy, &stats)), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_no_preferred_means_latency_order_only() {
        let stats = HarvestStats::new();
        let records = vec![resolved("a", "US", Some(9.0)), resolved("b", "DE", Some(3.0))];
        let policy = RegionPolicy {
            fallback: vec!["FR".to_string()],
            max_output: 1,
            ..Default::default()
        };
        assert_eq!(addresses(&select(records, &policy, &stats)), vec!["b"]);
    }

    #[test]
    fn test_policy_from_config_normalizes_codes() {
        let config = Config {
            preferred_regions: vec![" us".to_string(), "".to_string()],
            fallback_regions: vec!["jp".to_string()],
            max_output: 5,
            ..Config::default()
        };
        let policy = RegionPolicy::from_config(&config);
        assert_eq!(policy.preferred, vec!["US"]);
        assert_eq!(policy.fallback, vec!["JP"]);
        assert_eq!(policy.max_output, 5);
    }
}
