//! Harvest orchestration.
//!
//! Runs up to `max_cycles` fetch cycles until one reaches `min_yield`
//! valid records, then resolves countries for the best cycle, selects and
//! writes the result.

mod cycle;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::app::{print_harvest_statistics, print_simple_summary};
use crate::config::Config;
use crate::error_handling::{HarvestError, HarvestStats};
use crate::extract::Extractor;
use crate::geoip::GeoResolver;
use crate::initialization::{init_client, init_geo_client};
use crate::models::{CandidateRecord, SourceSpec};
use crate::output::write_records;
use crate::selection::{select, RegionPolicy};
use crate::validate::Normalizer;

use cycle::{harvest_cycle, CycleContext};

/// Results of a completed harvest run.
#[derive(Debug, Clone)]
pub struct HarvestReport {
    /// Number of lines written to the output file
    pub written: usize,
    /// Valid, deduplicated records in the cycle that was used
    pub valid: usize,
    /// Fetch cycles performed
    pub cycles: usize,
    /// Path of the output file
    pub output: PathBuf,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Runs a harvest with the provided configuration.
///
/// # Errors
///
/// - [`HarvestError::InsufficientYield`] when no cycle produced a single
///   valid record; the output file is not touched
/// - [`HarvestError::NothingToWrite`] when selection removed every record
/// - [`HarvestError::Write`] when the output file cannot be replaced
/// - initialization errors for the HTTP clients
pub async fn run_harvest(config: Config) -> Result<HarvestReport> {
    let start_time = Instant::now();
    let stats = HarvestStats::new();

    let client = init_client(&config).context("Failed to initialize HTTP client")?;
    let extractor = Extractor::new(config.positional_layout(), config.max_rows);
    let normalizer = Normalizer::from_config(&config);
    let sources = config.source_specs();
    info!(
        "Harvesting {} source{} (min yield {}, up to {} cycle{})",
        sources.len(),
        if sources.len() == 1 { "" } else { "s" },
        config.min_yield,
        config.max_cycles.max(1),
        if config.max_cycles.max(1) == 1 { "" } else { "s" },
    );

    let ctx = CycleContext {
        client: &client,
        config: &config,
        extractor: &extractor,
        normalizer: &normalizer,
        stats: &stats,
    };
    let (best, cycles) = run_cycles(&ctx, &sources).await;

    if best.is_empty() {
        print_harvest_statistics(&stats);
        return Err(HarvestError::InsufficientYield {
            found: 0,
            required: config.min_yield,
            cycles,
        }
        .into());
    }
    if best.len() < config.min_yield {
        warn!(
            "Proceeding with {} records after {} cycles (wanted at least {})",
            best.len(),
            cycles,
            config.min_yield
        );
    }
    let valid = best.len();

    let geo_client = init_geo_client(&config).context("Failed to initialize geo HTTP client")?;
    let resolver = GeoResolver::from_config(&config, geo_client).await;
    let resolved = resolver.resolve_all(best, &stats).await;

    let selected = select(resolved, &RegionPolicy::from_config(&config), &stats);
    print_harvest_statistics(&stats);

    let written = write_records(&config.output, &selected)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    print_simple_summary(written, cycles, elapsed_seconds);

    Ok(HarvestReport {
        written,
        valid,
        cycles,
        output: config.output.clone(),
        elapsed_seconds,
    })
}

/// Repeats harvest cycles until one meets `min_yield` or cycles run out.
///
/// Returns the largest cycle's records and the number of cycles run.
async fn run_cycles(
    ctx: &CycleContext<'_>,
    sources: &[SourceSpec],
) -> (Vec<CandidateRecord>, usize) {
    let max_cycles = ctx.config.max_cycles.max(1);
    let backoff = Duration::from_secs(ctx.config.cycle_backoff_secs);
    let mut best: Vec<CandidateRecord> = Vec::new();

    for cycle in 1..=max_cycles {
        let records = harvest_cycle(ctx, sources).await;
        info!("Cycle {}/{}: {} valid records", cycle, max_cycles, records.len());

        if records.len() > best.len() {
            best = records;
        }
        if !best.is_empty() && best.len() >= ctx.config.min_yield {
            return (best, cycle);
        }

        if cycle < max_cycles {
            let delay = backoff * cycle as u32;
            warn!(
                "{}; retrying in {}s",
                HarvestError::InsufficientYield {
                    found: best.len(),
                    required: ctx.config.min_yield,
                    cycles: cycle,
                },
                delay.as_secs()
            );
            tokio::time::sleep(delay).await;
        }
    }

    (best, max_cycles)
}
