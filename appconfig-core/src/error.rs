//! Error types for AppConfig.
//!
//! A single error hierarchy built with `thiserror`. A package with no
//! configuration is deliberately absent from this enum: lookups report it as
//! `None`, not as an error.

use thiserror::Error;

/// Result type alias using `AppConfigError`.
pub type Result<T> = std::result::Result<T, AppConfigError>;

/// Main error type for all AppConfig operations.
#[derive(Debug, Error)]
pub enum AppConfigError {
    // ═══════════════════════════════════════════════════════════════════════════
    // STORE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The durable store could not be reached or opened.
    #[error("Config store unavailable: {0}")]
    StoreUnavailable(String),

    /// The durable store was reached but the read failed.
    #[error("Config store read failed: {0}")]
    StoreRead(String),

    /// Writing to the durable store failed.
    #[error("Config store write failed: {0}")]
    StoreWrite(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Invalid process configuration (environment, flags).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppConfigError {
    /// Returns true if the error came from reading or writing the durable store.
    ///
    /// A store error during refresh means no fresh snapshot could be loaded.
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            AppConfigError::StoreUnavailable(_)
                | AppConfigError::StoreRead(_)
                | AppConfigError::StoreWrite(_)
                | AppConfigError::IoError(_)
                | AppConfigError::JsonError(_)
        )
    }

    /// Rebuilds an equivalent error, for handing one failure to several callers.
    ///
    /// Source errors that cannot be cloned keep their message; a JSON error
    /// becomes `StoreRead`, an I/O error keeps its kind.
    pub fn replay(&self) -> Self {
        match self {
            AppConfigError::StoreUnavailable(msg) => AppConfigError::StoreUnavailable(msg.clone()),
            AppConfigError::StoreRead(msg) => AppConfigError::StoreRead(msg.clone()),
            AppConfigError::StoreWrite(msg) => AppConfigError::StoreWrite(msg.clone()),
            AppConfigError::JsonError(e) => AppConfigError::StoreRead(e.to_string()),
            AppConfigError::IoError(e) => {
                AppConfigError::IoError(std::io::Error::new(e.kind(), e.to_string()))
            }
            AppConfigError::ConfigError(msg) => AppConfigError::ConfigError(msg.clone()),
            AppConfigError::InternalError(msg) => AppConfigError::InternalError(msg.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppConfigError::StoreRead("connection reset".into());
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_error_classification() {
        assert!(AppConfigError::StoreUnavailable("down".into()).is_store_error());
        assert!(AppConfigError::StoreRead("bad row".into()).is_store_error());
        assert!(!AppConfigError::ConfigError("bad flag".into()).is_store_error());
    }

    #[test]
    fn test_replay_keeps_kind_and_message() {
        let err = AppConfigError::StoreUnavailable("down".into());
        let copy = err.replay();
        assert!(matches!(copy, AppConfigError::StoreUnavailable(ref m) if m == "down"));

        let io = AppConfigError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        match io.replay() {
            AppConfigError::IoError(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected {other:?}"),
        }

        let json = AppConfigError::from(serde_json::from_str::<u32>("x").unwrap_err());
        assert!(matches!(json.replay(), AppConfigError::StoreRead(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> = serde_json::from_str("invalid");
        let result: Result<serde_json::Value> = json_result.map_err(AppConfigError::from);
        assert!(matches!(result, Err(AppConfigError::JsonError(_))));
        assert!(result.unwrap_err().is_store_error());
    }
}
