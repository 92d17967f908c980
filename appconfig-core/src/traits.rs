//! Common traits for AppConfig.
//!
//! The cache talks to its durable store only through [`ConfigStore`], so
//! backends can be swapped (memory for tests, file or database in production).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AppConfig, RequestContext};

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Durable source of application configuration records.
///
/// Implementations might use:
/// - In-memory storage (for testing/development)
/// - A JSON file (for single-node deployments)
/// - A SQL table (for production)
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Reads every configuration record currently in the store.
    ///
    /// Always a complete snapshot: no pagination, no filtering, no deltas.
    /// Records may repeat a package name; callers decide how to resolve that.
    async fn read_all(&self, ctx: &RequestContext) -> Result<Vec<AppConfig>>;
}

#[async_trait]
impl<T: ConfigStore + ?Sized> ConfigStore for Arc<T> {
    async fn read_all(&self, ctx: &RequestContext) -> Result<Vec<AppConfig>> {
        (**self).read_all(ctx).await
    }
}
