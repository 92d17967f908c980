//! # AppConfig Store
//!
//! Durable sources of application configuration records.
//!
//! This crate provides two backends behind [`ConfigStore`]:
//!
//! - **Memory**: records held in process, for development and testing
//! - **File**: a JSON array on disk, re-read on every snapshot request
//!
//! ## Example
//!
//! ```rust,ignore
//! use appconfig_store::{ConfigStore, FileStore};
//!
//! let store = FileStore::new("configs.json");
//! let records = store.read_all(&RequestContext::new()).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod memory;
mod file;

pub use memory::MemoryStore;
pub use file::FileStore;

// Re-export the trait from core
pub use appconfig_core::traits::ConfigStore;
