//! End-of-run statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{DropReason, HarvestStats, SourceFailure};
use crate::geoip::GeoTierKind;

/// Prints drop, source failure and geo tier counters to the log.
///
/// Categories with a zero count are left out.
pub fn print_harvest_statistics(stats: &HarvestStats) {
    info!("Candidates seen: {}", stats.candidates_seen());

    let total_drops = stats.total_drops();
    if total_drops > 0 {
        info!("Dropped Candidates ({} total):", total_drops);
        for reason in DropReason::iter() {
            let count = stats.get_drop_count(reason);
            if count > 0 {
                info!("   {}: {}", reason.as_str(), count);
            }
        }
    }

    let total_failures = stats.total_source_failures();
    if total_failures > 0 {
        info!("Source Failures ({} total):", total_failures);
        for failure in SourceFailure::iter() {
            let count = stats.get_source_failure_count(failure);
            if count > 0 {
                info!("   {}: {}", failure.as_str(), count);
            }
        }
    }

    info!("Geo Resolution:");
    for tier in GeoTierKind::iter() {
        let count = stats.get_geo_hit_count(tier);
        if count > 0 {
            info!("   {}: {}", tier.as_str(), count);
        }
    }
    if stats.geo_exhausted() > 0 {
        info!("   Unresolved (UNKNOWN): {}", stats.geo_exhausted());
    }
}

/// Prints a one-line summary of the run.
pub fn print_simple_summary(written: usize, cycles: usize, elapsed_seconds: f64) {
    info!(
        "✅ Wrote {} record{} after {} cycle{} in {:.1}s",
        written,
        if written == 1 { "" } else { "s" },
        cycles,
        if cycles == 1 { "" } else { "s" },
        elapsed_seconds
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_statistics_empty_and_populated() {
        // Must not panic with or without counts
        let stats = HarvestStats::new();
        print_harvest_statistics(&stats);

        stats.increment_drop(DropReason::InvalidAddress);
        stats.increment_source_failure(SourceFailure::Timeout);
        stats.record_geo_outcome(Some(GeoTierKind::RegionHint));
        stats.record_geo_outcome(None);
        print_harvest_statistics(&stats);
        print_simple_summary(1, 1, 0.5);
    }
}
