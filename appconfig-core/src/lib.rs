//! # AppConfig Core
//!
//! Core types, errors, and traits shared by every AppConfig crate.
//!
//! - **Types**: the per-application [`AppConfig`] record and the [`RequestContext`]
//!   threaded through store reads and logging
//! - **Errors**: a single error enum with classification helpers
//! - **Constants**: refresh defaults and environment variable names
//! - **Traits**: the [`ConfigStore`] seam the cache reads snapshots through
//!
//! ## Example
//!
//! ```rust
//! use appconfig_core::{AppConfig, Platform};
//!
//! let config = AppConfig::new("com.example.app", Platform::Android);
//! let json = serde_json::to_string(&config).unwrap();
//! assert!(json.contains("com.example.app"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{AppConfigError, Result};
pub use traits::*;
pub use types::*;
