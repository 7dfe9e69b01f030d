//! Country resolution for validated records.
//!
//! An ordered chain of [`GeoTier`]s is consulted per record and the first
//! code returned wins; later tiers are not called. The default chain is:
//! 1. [`LocalDatabase`]: MaxMind `.mmdb` lookup (left out if the file is missing)
//! 2. [`RemoteLookup`]: JSON geolocation API (optional)
//! 3. [`RegionHint`]: static table over the row's region text
//!
//! When every tier comes back empty the record is tagged
//! [`UNKNOWN_COUNTRY`](crate::config::UNKNOWN_COUNTRY).

mod hint;
mod local;
mod remote;

pub use hint::RegionHint;
pub use local::LocalDatabase;
pub use remote::RemoteLookup;

use std::fmt;

use async_trait::async_trait;
use strum_macros::EnumIter;

use crate::config::{Config, UNKNOWN_COUNTRY};
use crate::error_handling::HarvestStats;
use crate::models::{CandidateRecord, ResolvedRecord};

/// Identifies a tier in logs and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum GeoTierKind {
    LocalDatabase,
    RemoteLookup,
    RegionHint,
}

impl GeoTierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoTierKind::LocalDatabase => "Local database",
            GeoTierKind::RemoteLookup => "Remote lookup",
            GeoTierKind::RegionHint => "Region hint",
        }
    }
}

impl fmt::Display for GeoTierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One source of country codes.
///
/// Implementations swallow their own failures: a tier that cannot answer
/// returns `None` and the next tier is tried.
#[async_trait]
pub trait GeoTier: Send + Sync {
    fn kind(&self) -> GeoTierKind;

    async fn resolve(&self, record: &CandidateRecord) -> Option<String>;
}

/// Two ASCII letters.
pub(crate) fn is_iso_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Ordered chain of geo tiers.
pub struct GeoResolver {
    tiers: Vec<Box<dyn GeoTier>>,
}

impl GeoResolver {
    pub fn new(tiers: Vec<Box<dyn GeoTier>>) -> Self {
        Self { tiers }
    }

    /// Builds the default chain from configuration.
    pub async fn from_config(config: &Config, geo_client: reqwest::Client) -> Self {
        let mut tiers: Vec<Box<dyn GeoTier>> = Vec::new();

        if let Some(db) = LocalDatabase::open_optional(&config.geoip_db).await {
            tiers.push(Box::new(db));
        }
        if config.no_remote_geo {
            log::info!("Remote geo lookup disabled");
        } else {
            tiers.push(Box::new(RemoteLookup::from_config(geo_client, config)));
        }
        tiers.push(Box::new(RegionHint::new(&config.region_map)));

        Self::new(tiers)
    }

    pub fn tier_kinds(&self) -> Vec<GeoTierKind> {
        self.tiers.iter().map(|t| t.kind()).collect()
    }

    /// Tags a record with the first code any tier produces.
    pub async fn resolve(&self, record: CandidateRecord, stats: &HarvestStats) -> ResolvedRecord {
        for tier in &self.tiers {
            if let Some(country) = tier.resolve(&record).await {
                log::debug!("{} resolved {} to {}", tier.kind(), record.address, country);
                stats.record_geo_outcome(Some(tier.kind()));
                return ResolvedRecord {
                    record,
                    country,
                    resolved_by: Some(tier.kind()),
                };
            }
        }

        log::debug!("No geo tier resolved {}", record.address);
        stats.record_geo_outcome(None);
        ResolvedRecord {
            record,
            country: UNKNOWN_COUNTRY.to_string(),
            resolved_by: None,
        }
    }

    /// Resolves records one after another, preserving order.
    pub async fn resolve_all(
        &self,
        records: Vec<CandidateRecord>,
        stats: &HarvestStats,
    ) -> Vec<ResolvedRecord> {
        let mut resolved = Vec::with_capacity(records.len());
        for record in records {
            resolved.push(self.resolve(record, stats).await);
        }
        resolved
    }
}
