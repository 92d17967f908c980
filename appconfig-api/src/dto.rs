//! DTOs for API responses.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use appconfig_cache::CacheStats;

/// Response for the health check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server is accepting requests
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// Cache statistics.
#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    /// Snapshot generation (0 before the first successful load)
    pub generation: u64,
    /// Packages in the current snapshot
    pub entries: usize,
    /// Store reads attempted
    pub store_reads: u64,
    /// Store reads that failed
    pub store_failures: u64,
    /// Lookups served
    pub lookups: u64,
    /// Requests for unconfigured packages
    pub misses: u64,
    /// Refresh interval in milliseconds
    pub refresh_interval_ms: u64,
    /// Age of the current snapshot in milliseconds
    pub snapshot_age_ms: Option<u64>,
    /// When the current snapshot was loaded
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            generation: stats.generation,
            entries: stats.entries,
            store_reads: stats.store_reads,
            store_failures: stats.store_failures,
            lookups: stats.lookups,
            misses: stats.misses,
            refresh_interval_ms: millis(stats.refresh_interval),
            snapshot_age_ms: stats.last_refresh_age.map(millis),
            last_refreshed_at: stats.last_refreshed_at,
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Response for a forced refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// Whether a store read replaced the snapshot
    pub reloaded: bool,
    /// Statistics after the refresh
    pub stats: CacheStatsResponse,
}
