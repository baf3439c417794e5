use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::AREA_CACHE_TTL_SECS;

/// A city the provider operates in. Pre-existing catalog data, never created
/// by the page pipeline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// A locality within a city. Many areas per location.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: i64,
    pub name: String,
    pub location_id: i64,
}

struct CacheEntry {
    areas: Vec<Area>,
    fetched_at: DateTime<Utc>,
}

/// Explicit per-location cache for area fetches. Entries carry their fetch
/// time, expire after a TTL, and are invalidated explicitly after catalog
/// mutations; there is no ambient global query cache.
pub struct FetchCache {
    ttl: Duration,
    entries: HashMap<i64, CacheEntry>,
}

impl Default for FetchCache {
    fn default() -> Self {
        Self::new(Duration::seconds(AREA_CACHE_TTL_SECS))
    }
}

impl FetchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Fresh entry for this location, or `None` if absent or expired.
    pub fn get(&self, location_id: i64) -> Option<&[Area]> {
        let entry = self.entries.get(&location_id)?;
        if Utc::now() - entry.fetched_at > self.ttl {
            return None;
        }
        Some(&entry.areas)
    }

    pub fn put(&mut self, location_id: i64, areas: Vec<Area>) {
        self.entries.insert(
            location_id,
            CacheEntry {
                areas,
                fetched_at: Utc::now(),
            },
        );
    }

    pub fn invalidate(&mut self, location_id: i64) {
        self.entries.remove(&location_id);
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }
}
