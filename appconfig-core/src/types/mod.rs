//! Domain types for AppConfig.
//!
//! - [`AppConfig`]: configuration record for one application package
//! - [`RequestContext`]: request-scoped data carried into store reads and logs

mod app_config;
mod context;

pub use app_config::*;
pub use context::*;
