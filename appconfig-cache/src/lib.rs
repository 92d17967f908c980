//! TTL-refreshed cache of application configuration.
//!
//! [`ConfigCache`] serves lookups from an in-memory snapshot and reloads the
//! whole snapshot from a [`ConfigStore`](appconfig_core::ConfigStore) once the
//! refresh interval has passed. At most one reload runs at a time.

mod cache;
mod settings;

pub use cache::{CacheStats, ConfigCache, Snapshot};
pub use settings::CacheSettings;
