//! One harvest cycle: fetch every source, extract and validate its candidates.

use log::{debug, info};

use crate::config::Config;
use crate::error_handling::HarvestStats;
use crate::extract::Extractor;
use crate::fetch::fetch_document;
use crate::models::{CandidateRecord, SourceSpec};
use crate::selection::dedup_first;
use crate::validate::Normalizer;

/// Shared, read-only inputs of a cycle.
pub(crate) struct CycleContext<'a> {
    pub client: &'a reqwest::Client,
    pub config: &'a Config,
    pub extractor: &'a Extractor,
    pub normalizer: &'a Normalizer,
    pub stats: &'a HarvestStats,
}

/// Runs the fetch, extract and validate stages over all sources, in order.
///
/// Returns deduplicated records. Failed sources and documents without any
/// recognisable structure are skipped.
pub(crate) async fn harvest_cycle(
    ctx: &CycleContext<'_>,
    sources: &[SourceSpec],
) -> Vec<CandidateRecord> {
    let mut records = Vec::new();

    for spec in sources {
        let Some(document) = fetch_document(ctx.client, spec, ctx.config, ctx.stats).await else {
            continue;
        };

        let extraction = match ctx.extractor.extract(&document, ctx.normalizer) {
            Ok(extraction) => extraction,
            Err(e) => {
                debug!("{}", e);
                info!("No candidates in {} ({})", spec.url, spec.kind);
                continue;
            }
        };

        for invalid in &extraction.rejected {
            debug!("Dropping candidate from {}: {}", spec.url, invalid);
            ctx.stats.increment_drop(invalid.reason);
        }
        ctx.stats.add_candidates_seen(extraction.seen);
        info!(
            "{}: {} of {} candidates valid ({})",
            spec.url,
            extraction.records.len(),
            extraction.seen,
            extraction.strategy
        );
        records.extend(extraction.records);
    }

    dedup_first(records, ctx.stats)
}
