//! In-memory TTL cache of application configuration.
//!
//! The cache holds one [`Snapshot`] behind an atomic pointer. Readers load the
//! pointer and never wait; a reload builds a complete new snapshot and swaps it
//! in, so no reader can see a mix of two store reads.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument};

use appconfig_core::error::{AppConfigError, Result};
use appconfig_core::traits::ConfigStore;
use appconfig_core::types::{AppConfig, RequestContext};

use crate::settings::CacheSettings;

/// One complete load of the durable store, keyed by package name.
#[derive(Debug)]
pub struct Snapshot {
    configs: HashMap<String, Arc<AppConfig>>,
    generation: u64,
    /// Invalidation count observed when the store read started
    invalidations: u64,
    loaded_at: Option<Instant>,
    loaded_at_utc: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// The snapshot a new cache starts with: no records, never loaded.
    fn empty() -> Self {
        Self {
            configs: HashMap::new(),
            generation: 0,
            invalidations: 0,
            loaded_at: None,
            loaded_at_utc: None,
        }
    }

    /// Builds a snapshot from one store read. Later duplicates win.
    fn build(records: Vec<AppConfig>, generation: u64, invalidations: u64) -> Self {
        let mut configs = HashMap::with_capacity(records.len());
        for record in records {
            configs.insert(record.app_package_name.clone(), Arc::new(record));
        }
        Self {
            configs,
            generation,
            invalidations,
            loaded_at: Some(Instant::now()),
            loaded_at_utc: Some(Utc::now()),
        }
    }

    /// Returns the record for `app_package_name`.
    pub fn get(&self, app_package_name: &str) -> Option<Arc<AppConfig>> {
        self.configs.get(app_package_name).cloned()
    }

    /// Returns true if `app_package_name` is configured in this snapshot.
    pub fn contains(&self, app_package_name: &str) -> bool {
        self.configs.contains_key(app_package_name)
    }

    /// Returns the configured package names, sorted.
    pub fn package_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.configs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of configured packages.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Returns true if no package is configured.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Load counter: 0 for the initial empty snapshot, then +1 per successful reload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wall-clock time of the store read this snapshot came from.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at_utc
    }

    /// Time since the store read this snapshot came from.
    pub fn age(&self) -> Option<Duration> {
        self.loaded_at.map(|at| at.elapsed())
    }
}

#[derive(Debug, Default)]
struct Counters {
    store_reads: AtomicU64,
    store_failures: AtomicU64,
    lookups: AtomicU64,
    misses: AtomicU64,
}

/// TTL-refreshed configuration cache.
///
/// Lookups go through [`app_pkg_config`](Self::app_pkg_config), which reloads
/// the whole snapshot from the store when it is older than the refresh
/// interval. Concurrent callers that all find the snapshot stale serialize on
/// the refresh lock; only the first reads the store. The rest share its
/// outcome: the new snapshot, or the error of the failed read.
pub struct ConfigCache {
    store: Arc<dyn ConfigStore>,
    settings: CacheSettings,
    snapshot: ArcSwap<Snapshot>,
    /// Guards store reads; holds the error of the last attempt if it failed
    refresh_lock: Mutex<Option<AppConfigError>>,
    /// Completed store reads, successful or not
    attempts: AtomicU64,
    invalidations: AtomicU64,
    counters: Counters,
}

impl ConfigCache {
    /// Creates a cache with settings read from the environment.
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self::with_settings(store, CacheSettings::from_env())
    }

    /// Creates a cache with explicit settings.
    ///
    /// The cache starts empty and never loaded, so the first call refreshes.
    pub fn with_settings(store: Arc<dyn ConfigStore>, settings: CacheSettings) -> Self {
        Self {
            store,
            settings,
            snapshot: ArcSwap::from_pointee(Snapshot::empty()),
            refresh_lock: Mutex::new(None),
            attempts: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
            counters: Counters::default(),
        }
    }

    /// Returns the cache settings.
    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Returns the configuration for `app_package_name`, refreshing first if stale.
    ///
    /// A package with no configuration is `Ok(None)` plus an error log; only a
    /// failed store read is an `Err`.
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), app_package_name = %app_package_name))]
    pub async fn app_pkg_config(
        &self,
        ctx: &RequestContext,
        app_package_name: &str,
    ) -> Result<Option<Arc<AppConfig>>> {
        self.refresh(ctx).await?;
        Ok(self.lookup_reporting_miss(app_package_name))
    }

    /// Reloads the snapshot from the store if it is stale.
    ///
    /// Returns `Ok(true)` when a store read replaced the snapshot and
    /// `Ok(false)` when the snapshot was still fresh. On a failed read the
    /// current snapshot stays in place and remains stale, so the next call
    /// tries again. Callers that were already waiting on that read get its
    /// error instead of reading again.
    #[instrument(skip_all, fields(request_id = %ctx.request_id()))]
    pub async fn refresh(&self, ctx: &RequestContext) -> Result<bool> {
        if !self.is_stale(&self.snapshot.load()) {
            return Ok(false);
        }

        let attempts_seen = self.attempts.load(Ordering::Acquire);
        let mut last_failure = self.refresh_lock.lock().await;

        // Another caller may have reloaded while we waited for the lock.
        let current = self.snapshot.load_full();
        if !self.is_stale(&current) {
            debug!(generation = current.generation, "Snapshot already refreshed");
            return Ok(false);
        }

        if self.attempts.load(Ordering::Acquire) != attempts_seen {
            if let Some(err) = last_failure.as_ref() {
                debug!(error = %err, "Store read failed while waiting");
                return Err(err.replay());
            }
        }

        let invalidations = self.invalidations.load(Ordering::Acquire);
        self.counters.store_reads.fetch_add(1, Ordering::Relaxed);

        let result = self.store.read_all(ctx).await;
        self.attempts.fetch_add(1, Ordering::AcqRel);

        let records = match result {
            Ok(records) => records,
            Err(err) => {
                self.counters.store_failures.fetch_add(1, Ordering::Relaxed);
                error!(
                    error = %err,
                    generation = current.generation,
                    "error loading app configs"
                );
                *last_failure = Some(err.replay());
                return Err(err);
            }
        };
        *last_failure = None;

        let snapshot = Snapshot::build(records, current.generation + 1, invalidations);
        info!(
            generation = snapshot.generation,
            entries = snapshot.len(),
            "loaded new app config values"
        );
        self.snapshot.store(Arc::new(snapshot));

        Ok(true)
    }

    /// Looks up `app_package_name` in the current snapshot. Never touches the store.
    pub fn lookup(&self, app_package_name: &str) -> Option<Arc<AppConfig>> {
        self.counters.lookups.fetch_add(1, Ordering::Relaxed);
        self.snapshot.load().get(app_package_name)
    }

    /// Like [`lookup`](Self::lookup), but counts a miss and logs it at error level.
    pub fn lookup_reporting_miss(&self, app_package_name: &str) -> Option<Arc<AppConfig>> {
        let config = self.lookup(app_package_name);
        if config.is_none() {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            error!(app_package_name, "requested config for unconfigured app");
        }
        config
    }

    /// Marks the snapshot stale so the next call reloads it.
    ///
    /// Only a store read that starts after this call clears the mark, so an
    /// invalidation is not lost to a read already in flight, a failed read,
    /// or a cancelled one.
    pub fn invalidate(&self) {
        self.invalidations.fetch_add(1, Ordering::AcqRel);
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.load_full()
    }

    /// Number of packages in the current snapshot.
    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    /// Returns true if the current snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let snapshot = self.snapshot.load();
        CacheStats {
            generation: snapshot.generation,
            entries: snapshot.len(),
            store_reads: self.counters.store_reads.load(Ordering::Relaxed),
            store_failures: self.counters.store_failures.load(Ordering::Relaxed),
            lookups: self.counters.lookups.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            refresh_interval: self.settings.refresh_interval,
            last_refresh_age: snapshot.age(),
            last_refreshed_at: snapshot.loaded_at(),
        }
    }

    fn is_stale(&self, snapshot: &Snapshot) -> bool {
        if self.invalidations.load(Ordering::Acquire) != snapshot.invalidations {
            return true;
        }
        match snapshot.loaded_at {
            Some(at) => at.elapsed() >= self.settings.refresh_interval,
            None => true,
        }
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Serialize)]
pub struct CacheStats {
    pub generation: u64,
    pub entries: usize,
    pub store_reads: u64,
    pub store_failures: u64,
    pub lookups: u64,
    /// Requests for packages with no configuration
    pub misses: u64,
    pub refresh_interval: Duration,
    pub last_refresh_age: Option<Duration>,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}
