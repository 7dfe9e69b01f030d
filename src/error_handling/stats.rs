//! Run statistics tracking.
//!
//! Counters for dropped candidates, source failures and geo tier outcomes.
//! All categories are initialized to zero on creation so reporting can
//! iterate them in a fixed order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{DropReason, SourceFailure};
use crate::geoip::GeoTierKind;

/// Statistics tracker for one harvest run.
///
/// Uses atomic counters behind `&self`, so the tracker can be passed down the
/// pipeline by shared reference.
pub struct HarvestStats {
    drops: HashMap<DropReason, AtomicUsize>,
    source_failures: HashMap<SourceFailure, AtomicUsize>,
    geo_hits: HashMap<GeoTierKind, AtomicUsize>,
    geo_exhausted: AtomicUsize,
    candidates_seen: AtomicUsize,
}

impl HarvestStats {
    pub fn new() -> Self {
        HarvestStats {
            drops: DropReason::iter().map(|r| (r, AtomicUsize::new(0))).collect(),
            source_failures: SourceFailure::iter()
                .map(|f| (f, AtomicUsize::new(0)))
                .collect(),
            geo_hits: GeoTierKind::iter()
                .map(|t| (t, AtomicUsize::new(0)))
                .collect(),
            geo_exhausted: AtomicUsize::new(0),
            candidates_seen: AtomicUsize::new(0),
        }
    }

    /// Increment a drop counter.
    pub fn increment_drop(&self, reason: DropReason) {
        if let Some(counter) = self.drops.get(&reason) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment drop counter for {:?} which is not in the map. \
                 This indicates a bug in HarvestStats initialization.",
                reason
            );
        }
    }

    /// Add `n` to a drop counter.
    pub fn add_drops(&self, reason: DropReason, n: usize) {
        if let Some(counter) = self.drops.get(&reason) {
            counter.fetch_add(n, Ordering::Relaxed);
        }
    }

    pub fn increment_source_failure(&self, failure: SourceFailure) {
        if let Some(counter) = self.source_failures.get(&failure) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment source failure counter for {:?} which is not in the map. \
                 This indicates a bug in HarvestStats initialization.",
                failure
            );
        }
    }

    /// Record which tier resolved a record, or that none did.
    pub fn record_geo_outcome(&self, tier: Option<GeoTierKind>) {
        match tier {
            Some(tier) => {
                if let Some(counter) = self.geo_hits.get(&tier) {
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            }
            None => {
                self.geo_exhausted.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn add_candidates_seen(&self, n: usize) {
        self.candidates_seen.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get_drop_count(&self, reason: DropReason) -> usize {
        self.drops
            .get(&reason)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn get_source_failure_count(&self, failure: SourceFailure) -> usize {
        self.source_failures
            .get(&failure)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn get_geo_hit_count(&self, tier: GeoTierKind) -> usize {
        self.geo_hits
            .get(&tier)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn geo_exhausted(&self) -> usize {
        self.geo_exhausted.load(Ordering::SeqCst)
    }

    pub fn candidates_seen(&self) -> usize {
        self.candidates_seen.load(Ordering::SeqCst)
    }

    /// Total dropped candidates across all reasons.
    pub fn total_drops(&self) -> usize {
        DropReason::iter().map(|r| self.get_drop_count(r)).sum()
    }

    /// Total failed source fetches across all categories.
    pub fn total_source_failures(&self) -> usize {
        SourceFailure::iter()
            .map(|f| self.get_source_failure_count(f))
            .sum()
    }
}

impl Default for HarvestStats {
    fn default() -> Self {
        Self::new()
    }
}
