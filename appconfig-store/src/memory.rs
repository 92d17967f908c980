//! In-memory configuration store.
//!
//! Holds records in process. Suitable for development, testing, and for
//! seeding a cache without a database.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, instrument, warn};

use appconfig_core::error::{AppConfigError, Result};
use appconfig_core::traits::ConfigStore;
use appconfig_core::types::{AppConfig, RequestContext};

/// In-memory configuration store.
///
/// Records are kept in insertion order, so a store seeded with duplicate
/// package names returns them in the order they were added.
///
/// # Thread Safety
///
/// All operations are thread-safe and can be called concurrently.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Records in insertion order
    records: RwLock<Vec<AppConfig>>,
    /// Number of `read_all` calls, successful or not
    reads: AtomicU64,
    /// When set, every read fails with this reason
    failure: RwLock<Option<String>>,
    /// Artificial latency applied to every read
    read_delay: Option<Duration>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `records`.
    pub fn with_records(records: impl IntoIterator<Item = AppConfig>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Adds latency to every read, to simulate a remote database.
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    /// Replaces the whole record set.
    pub fn replace(&self, records: impl IntoIterator<Item = AppConfig>) {
        *self.records.write() = records.into_iter().collect();
    }

    /// Inserts a record, replacing any existing record with the same package name.
    pub fn upsert(&self, record: AppConfig) {
        let mut records = self.records.write();
        match records
            .iter_mut()
            .find(|r| r.app_package_name == record.app_package_name)
        {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    /// Removes every record for `app_package_name`. Returns true if any was removed.
    pub fn remove(&self, app_package_name: &str) -> bool {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.app_package_name != app_package_name);
        records.len() != before
    }

    /// Makes every subsequent read fail with `reason` until [`recover`](Self::recover).
    pub fn fail_reads(&self, reason: impl Into<String>) {
        *self.failure.write() = Some(reason.into());
    }

    /// Clears a failure set with [`fail_reads`](Self::fail_reads).
    pub fn recover(&self) {
        *self.failure.write() = None;
    }

    /// Returns how many times the store has been read.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    #[instrument(skip_all, fields(request_id = %ctx.request_id()))]
    async fn read_all(&self, ctx: &RequestContext) -> Result<Vec<AppConfig>> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failure.read().clone();
        if let Some(reason) = failure {
            warn!(%reason, "Memory store read failing");
            return Err(AppConfigError::StoreUnavailable(reason));
        }

        let records = self.records.read().clone();
        debug!(count = records.len(), "Read config records");
        Ok(records)
    }
}
