//! Built-in defaults every builder starts from.

use crate::types::{DEFAULT_KEY_FIELD, DEFAULT_MAX_DEPTH};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with the default value of every known key.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("conversion.key_field", DEFAULT_KEY_FIELD)?
        .set_default("conversion.unique_field", DEFAULT_KEY_FIELD)?
        .set_default("conversion.max_depth", DEFAULT_MAX_DEPTH as u64)?
        .set_default("logging.enabled", true)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")?
        .set_default("logging.color", true)
}
