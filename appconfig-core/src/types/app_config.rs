//! Per-application configuration record.
//!
//! One [`AppConfig`] exists per application package. Records are read from the
//! durable store as a complete set and are never mutated once loaded.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Mobile platform an application is published on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android application (Play Integrity / SafetyNet attested)
    #[default]
    Android,
    /// iOS application (DeviceCheck attested)
    Ios,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Android => f.write_str("android"),
            Platform::Ios => f.write_str("ios"),
        }
    }
}

/// Configuration for one application package.
///
/// The cache keys records by [`app_package_name`](Self::app_package_name);
/// every other field is carried through untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Package identifier, e.g. `com.example.app`
    pub app_package_name: String,
    /// Platform the package is published on
    #[serde(default)]
    pub platform: Platform,
    /// Region codes this application may submit data for
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub allowed_regions: BTreeSet<String>,
    /// Accept submissions for any region
    #[serde(default)]
    pub allow_all_regions: bool,
    /// Require a CTS profile match on device attestations
    #[serde(default)]
    pub cts_profile_match: bool,
    /// Require basic integrity on device attestations
    #[serde(default)]
    pub basic_integrity: bool,
    /// How far in the past an attestation timestamp may be, in seconds
    #[serde(default)]
    pub allowed_past_seconds: u64,
    /// How far in the future an attestation timestamp may be, in seconds
    #[serde(default)]
    pub allowed_future_seconds: u64,
    /// Skip device attestation entirely (test deployments only)
    #[serde(default)]
    pub bypass_safetynet: bool,
}

impl AppConfig {
    /// Creates a record with no regions and attestation checks disabled.
    pub fn new(app_package_name: impl Into<String>, platform: Platform) -> Self {
        Self {
            app_package_name: app_package_name.into(),
            platform,
            ..Self::default()
        }
    }

    /// Adds an allowed region (stored upper-case).
    pub fn with_region(mut self, region: &str) -> Self {
        self.allowed_regions.insert(region.trim().to_uppercase());
        self
    }

    /// Allows every region.
    pub fn allowing_all_regions(mut self) -> Self {
        self.allow_all_regions = true;
        self
    }

    /// Returns true if the application may submit data for `region`.
    ///
    /// Region codes compare case-insensitively.
    pub fn is_allowed_region(&self, region: &str) -> bool {
        if self.allow_all_regions {
            return true;
        }
        let region = region.trim().to_uppercase();
        self.allowed_regions.contains(&region)
    }
}
