//! Constants for AppConfig.
//!
//! Refresh defaults and the names of the environment variables the
//! crates read their configuration from.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// REFRESH POLICY
// ═══════════════════════════════════════════════════════════════════════════════

/// Refresh interval used when no override is configured.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Intervals above this are accepted but logged as a warning.
pub const REFRESH_INTERVAL_WARN_THRESHOLD: Duration = Duration::from_secs(5 * 60);

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT VARIABLES
// ═══════════════════════════════════════════════════════════════════════════════

/// Refresh interval override, as a duration string (`"30s"`, `"2m"`).
pub const ENV_REFRESH_DURATION: &str = "CONFIG_REFRESH_DURATION";

/// Path of the JSON file backing the file store.
pub const ENV_STORE_PATH: &str = "CONFIG_STORE_PATH";

/// What the API does when the durable store cannot be read
/// (`shutdown` or `serve-stale`).
pub const ENV_STORE_FAILURE_POLICY: &str = "CONFIG_STORE_FAILURE_POLICY";

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP
// ═══════════════════════════════════════════════════════════════════════════════

/// Header carrying the caller's request id into the [`RequestContext`].
///
/// [`RequestContext`]: crate::types::RequestContext
pub const REQUEST_ID_HEADER: &str = "x-request-id";
