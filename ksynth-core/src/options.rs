//! Decode options
//!
//! Loaded from TOML by tools that need to relax checksum verification:
//!
//! ```toml
//! checksum = "warn"
//! ```

use serde::{Deserialize, Serialize};

/// What to do when a stored checksum disagrees with the computed one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumPolicy {
    /// Reject the unit
    #[default]
    Strict,
    /// Log a warning and keep decoding
    Warn,
    /// Keep decoding silently (forensic recovery of corrupt dumps)
    Ignore,
}

/// Options threaded through every decode call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecodeOptions {
    #[serde(default)]
    pub checksum: ChecksumPolicy,
}

impl DecodeOptions {
    /// Reject any checksum mismatch
    pub const fn strict() -> Self {
        Self {
            checksum: ChecksumPolicy::Strict,
        }
    }

    /// Accept mismatching checksums, logging each one
    pub const fn recovery() -> Self {
        Self {
            checksum: ChecksumPolicy::Warn,
        }
    }

    /// Parse options from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Serialize options to TOML text
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
