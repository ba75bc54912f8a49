//! # Warm-up Settings
//!
//! Externally loaded pool configuration. Settings are parsed from TOML
//! once at startup, before warm-up; the pool never re-reads them.
//!
//! One default count covers every category; individual categories
//! override it by name:
//!
//! ```toml
//! default_warm_up = 30
//! spawn_channel_capacity = 256
//!
//! [categories]
//! "enemy:goblin" = 12
//! "hit-effect" = 48
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading or parsing pool settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// Settings document is not valid TOML for this schema.
    #[error("invalid settings document: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Warm-up counts and channel sizing for one pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSettings {
    /// Warm-up count applied to every category without an override.
    #[serde(default = "default_warm_up")]
    pub default_warm_up: usize,

    /// Capacity of the overflow-spawn event channel.
    ///
    /// Absent disables spawn events entirely.
    #[serde(default)]
    pub spawn_channel_capacity: Option<usize>,

    /// Per-category warm-up overrides, keyed by category name.
    #[serde(default)]
    pub categories: HashMap<String, usize>,
}

const fn default_warm_up() -> usize {
    30
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            default_warm_up: default_warm_up(),
            spawn_channel_capacity: None,
            categories: HashMap::new(),
        }
    }
}

impl PoolSettings {
    /// Warm-up count for `category`: the override when present, the
    /// shared default otherwise.
    #[must_use]
    pub fn warm_up_count(&self, category: &str) -> usize {
        self.categories
            .get(category)
            .copied()
            .unwrap_or(self.default_warm_up)
    }

    /// Parses settings from a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] when the document does not match the
    /// schema.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(document)?)
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read,
    /// [`ConfigError::Parse`] when it does not match the schema.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let document = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_toml_str(&document)?;
        tracing::info!("pool settings loaded from {}", path.as_ref().display());
        Ok(settings)
    }
}
