//! Country lookup against a local MaxMind database.

use std::net::IpAddr;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use maxminddb::Reader;

use super::{GeoTier, GeoTierKind};
use crate::models::CandidateRecord;

/// A loaded GeoLite2/GeoIP2 Country (or City) database.
pub struct LocalDatabase {
    reader: Reader<Vec<u8>>,
    /// Database build, for logging
    pub version: String,
}

impl LocalDatabase {
    /// Reads and parses the database file.
    pub async fn load(path: &Path) -> Result<Self> {
        log::info!("Loading GeoIP database from: {}", path.display());

        let db_bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read GeoIP database from {}", path.display()))?;
        Self::from_bytes(db_bytes)
            .with_context(|| format!("Failed to parse GeoIP database from {}", path.display()))
    }

    pub fn from_bytes(db_bytes: Vec<u8>) -> Result<Self> {
        let reader = Reader::from_source(db_bytes)?;
        let version = format!(
            "{} build_{}",
            reader.metadata.database_type, reader.metadata.build_epoch
        );
        Ok(Self { reader, version })
    }

    /// Loads the database, or returns `None` (with a warning) when it is
    /// missing or unreadable. The tier is then simply left out of the chain.
    pub async fn open_optional(path: &Path) -> Option<Self> {
        match Self::load(path).await {
            Ok(db) => {
                log::info!("GeoIP database loaded ({})", db.version);
                Some(db)
            }
            Err(e) => {
                log::warn!("Local GeoIP lookup disabled: {:#}", e);
                None
            }
        }
    }

    /// Looks up the ISO country code of `ip`.
    pub fn lookup_country(&self, ip: &str) -> Option<String> {
        let ip_addr: IpAddr = ip.parse().ok()?;

        // maxminddb 0.27: lookup() then has_data()/decode()
        let lookup = self.reader.lookup(ip_addr).ok()?;
        if !lookup.has_data() {
            return None;
        }
        let country: maxminddb::geoip2::Country = match lookup.decode() {
            Ok(Some(country)) => country,
            Ok(None) | Err(_) => return None,
        };

        country
            .country
            .iso_code
            .map(|code| code.to_ascii_uppercase())
    }
}

#[async_trait]
impl GeoTier for LocalDatabase {
    fn kind(&self) -> GeoTierKind {
        GeoTierKind::LocalDatabase
    }

    async fn resolve(&self, record: &CandidateRecord) -> Option<String> {
        self.lookup_country(&record.address)
    }
}
