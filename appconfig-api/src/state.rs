//! App state: config cache, store-failure policy, shutdown signal.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};

use appconfig_cache::{CacheSettings, ConfigCache};
use appconfig_core::constants::{ENV_STORE_FAILURE_POLICY, ENV_STORE_PATH};
use appconfig_core::error::AppConfigError;
use appconfig_core::traits::ConfigStore;
use appconfig_store::{FileStore, MemoryStore};

/// What to do when the durable store cannot be read during a refresh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreFailurePolicy {
    /// Fail the request and shut the server down.
    #[default]
    Shutdown,
    /// Keep answering from the last loaded snapshot, if there is one.
    ServeStale,
}

impl FromStr for StoreFailurePolicy {
    type Err = AppConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shutdown" => Ok(Self::Shutdown),
            "serve-stale" | "serve_stale" => Ok(Self::ServeStale),
            other => Err(AppConfigError::ConfigError(format!(
                "unknown store failure policy: {other}"
            ))),
        }
    }
}

impl fmt::Display for StoreFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shutdown => f.write_str("shutdown"),
            Self::ServeStale => f.write_str("serve-stale"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ApiConfig {
    /// JSON file backing the store; `None` serves an empty in-memory store
    pub store_path: Option<PathBuf>,
    pub failure_policy: StoreFailurePolicy,
    pub cache: CacheSettings,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let failure_policy = match std::env::var(ENV_STORE_FAILURE_POLICY) {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring {}", ENV_STORE_FAILURE_POLICY);
                StoreFailurePolicy::default()
            }),
            Err(_) => StoreFailurePolicy::default(),
        };

        Self {
            store_path: std::env::var(ENV_STORE_PATH).ok().map(PathBuf::from),
            failure_policy,
            cache: CacheSettings::from_env(),
        }
    }
}

pub struct AppState {
    pub config: ApiConfig,
    pub cache: ConfigCache,
    shutdown: watch::Sender<bool>,
}

impl AppState {
    pub fn new(config: ApiConfig) -> Self {
        let store: Arc<dyn ConfigStore> = match &config.store_path {
            Some(path) => {
                info!(path = %path.display(), "Using file config store");
                Arc::new(FileStore::new(path))
            }
            None => {
                warn!("No {} set, serving an empty in-memory config store", ENV_STORE_PATH);
                Arc::new(MemoryStore::new())
            }
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: ApiConfig, store: Arc<dyn ConfigStore>) -> Self {
        let cache = ConfigCache::with_settings(store, config.cache.clone());
        let (shutdown, _) = watch::channel(false);
        Self {
            config,
            cache,
            shutdown,
        }
    }

    /// Asks the server to stop accepting requests and exit.
    pub fn request_shutdown(&self, reason: &str) {
        error!(reason, "Shutting down: no trustworthy app config");
        self.shutdown.send_replace(true);
    }

    pub fn shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }
}
