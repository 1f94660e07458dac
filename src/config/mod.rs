//! Configuration
//!
//! Layered configuration for conversions and logging. Sources, lowest
//! precedence first: built-in defaults, the global config file, an explicit
//! config file, then `JMI__*` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::types::{ConvertOptions, DEFAULT_KEY_FIELD, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};

fn default_key_field() -> String {
    DEFAULT_KEY_FIELD.to_string()
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Field names and limits used when converting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Attribute supplying the map key (default: id)
    #[serde(default = "default_key_field")]
    pub key_field: String,

    /// Attribute read from embedded parent objects (default: id)
    #[serde(default = "default_key_field")]
    pub unique_field: String,

    /// Longest parent chain accepted by tree conversion (default: 256)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl ConversionConfig {
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions::new(self.key_field.clone(), self.unique_field.clone())
            .with_max_depth(self.max_depth)
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            key_field: default_key_field(),
            unique_field: default_key_field(),
            max_depth: default_max_depth(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JmiConfig {
    #[serde(default)]
    pub conversion: ConversionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
