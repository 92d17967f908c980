//! File-backed configuration store.
//!
//! The file is the durable store: every [`read_all`](ConfigStore::read_all)
//! re-reads it from disk, so edits become visible on the cache's next refresh.
//!
//! # File Format
//!
//! ```text
//! [
//!   { "app_package_name": "com.example.app", "platform": "android", ... },
//!   ...
//! ]
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use appconfig_core::error::{AppConfigError, Result};
use appconfig_core::traits::ConfigStore;
use appconfig_core::types::{AppConfig, RequestContext};

/// JSON file configuration store.
#[derive(Clone, Debug)]
pub struct FileStore {
    /// Path to the JSON file
    path: PathBuf,
}

impl FileStore {
    /// Creates a store reading from `path`.
    ///
    /// The file is not touched until the first read or write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the file contents with `records`.
    ///
    /// Writes to a temporary file first and renames it into place, so readers
    /// never see a half-written file.
    #[instrument(skip(self, records), fields(path = ?self.path, count = records.len()))]
    pub async fn write_all(&self, records: &[AppConfig]) -> Result<()> {
        let serialized = serde_json::to_vec_pretty(records)?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| AppConfigError::StoreWrite(format!("{}: {}", temp_path.display(), e)))?;
        file.write_all(&serialized).await?;
        file.sync_all().await?;

        fs::rename(&temp_path, &self.path).await?;

        info!("Wrote config store file");
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileStore {
    #[instrument(skip_all, fields(request_id = %ctx.request_id(), path = ?self.path))]
    async fn read_all(&self, ctx: &RequestContext) -> Result<Vec<AppConfig>> {
        let contents = fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppConfigError::StoreUnavailable(format!(
                "config file not found: {}",
                self.path.display()
            )),
            _ => AppConfigError::StoreUnavailable(format!("{}: {}", self.path.display(), e)),
        })?;

        let records: Vec<AppConfig> = serde_json::from_slice(&contents)
            .map_err(|e| AppConfigError::StoreRead(format!("{}: {}", self.path.display(), e)))?;

        debug!(count = records.len(), "Read config records from file");
        Ok(records)
    }
}
