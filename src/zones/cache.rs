//! Cache management for availability-zone lookups.
//!
//! Avoids a provider CLI call on every planning run.

use super::query::describe_zones;
use crate::error::ZoneLookupError;
use crate::models::ZoneId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Zone list as stored in a cache file.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct ZoneCache {
    pub region: String,
    pub zones: Vec<ZoneId>,
}

/// Default daily cache file name for `region`.
pub fn default_cache_file(region: &str) -> String {
    let now = chrono::Utc::now();
    format!("zone_cache_{region}_{}.json", now.format("%Y-%m-%d"))
}

/// Read the zone list from a cache file, or query the provider if the cache doesn't exist.
///
/// # Arguments
/// * `cache_file` - Optional path to a specific cache file. If None, uses default naming.
/// * `region` - Region to query on a cache miss.
///
/// # Returns
/// * `Ok(ZoneCache)` - The zones from cache or provider
/// * `Err` - If the cache file is specified but doesn't exist, or the query fails
pub fn read_zone_cache(cache_file: Option<&str>, region: &str) -> Result<ZoneCache, ZoneLookupError> {
    let cache_file = match cache_file {
        Some(file) => {
            if !Path::new(file).exists() {
                return Err(ZoneLookupError::MissingCache(file.to_string()));
            }
            log::info!("Using provided cache file: {file}");
            file.to_string()
        }
        None => default_cache_file(region),
    };

    match std::fs::read_to_string(&cache_file) {
        Ok(json) => {
            log::info!("Reading from cache file: {cache_file}");
            let mut deserializer = serde_json::Deserializer::from_str(&json);
            let cache: ZoneCache = serde_path_to_error::deserialize(&mut deserializer).map_err(
                |e| ZoneLookupError::Parse {
                    path: e.path().to_string(),
                    message: e.inner().to_string(),
                },
            )?;
            if cache.region != region {
                log::warn!(
                    "Cache file {cache_file} is for region {} not {region}",
                    cache.region
                );
            }
            Ok(cache)
        }
        Err(_) => {
            log::warn!("Cache file not found: {cache_file}");
            let cache = ZoneCache {
                region: region.to_string(),
                zones: describe_zones(region)?,
            };
            write_zone_cache(&cache_file, &cache)?;
            Ok(cache)
        }
    }
}

/// Write a zone list to `cache_file`.
pub fn write_zone_cache(cache_file: &str, cache: &ZoneCache) -> Result<(), ZoneLookupError> {
    let json = serde_json::to_string_pretty(cache).map_err(|e| ZoneLookupError::Parse {
        path: String::new(),
        message: e.to_string(),
    })?;
    log::warn!("Writing data to cache file: {cache_file}");
    std::fs::write(cache_file, json).map_err(|source| ZoneLookupError::Cache {
        path: cache_file.to_string(),
        source,
    })
}
