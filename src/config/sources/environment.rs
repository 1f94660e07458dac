//! Environment variable source: JMI__ prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;
use std::collections::HashMap;

/// Add environment variable overlay to builder.
/// Uses JMI__ prefix and __ as separator for nested keys, e.g.
/// `JMI__CONVERSION__KEY_FIELD`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    add_to_builder_from(builder, None)
}

/// Same as [`add_to_builder`] but reads from `vars` instead of the process
/// environment when given.
pub fn add_to_builder_from(
    builder: ConfigBuilder<DefaultState>,
    vars: Option<HashMap<String, String>>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("JMI")
            .separator("__")
            .try_parsing(true)
            .source(vars),
    );
    Ok(builder)
}
