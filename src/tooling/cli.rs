//! CLI Tooling
//!
//! Command-line interface for JMI conversions. Reads flat JMI data as JSON
//! from a file or stdin and prints the converted shape.

use crate::config::{ConfigLoader, JmiConfig};
use crate::error::ApiError;
use crate::engine::{convert, walk, Converted};
use crate::logging::{LogFormat, LogOutput, LoggingConfig};
use crate::types::{ConvertOptions, Shape};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

/// JMI CLI - JSON Model Interchange conversions
#[derive(Parser)]
#[command(name = "jmi")]
#[command(about = "Convert flat parent-linked JSON records into keyed maps and containment trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<LogOutput>,

    /// Log file path (if output includes "file"); outranks JMI_LOG_FILE
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply level, format and output flags on top of the loaded
    /// configuration. `--log-file` is passed to `init_logging` directly.
    pub fn apply_logging_overrides(&self, logging: &mut LoggingConfig) {
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = self.log_format {
            logging.format = format;
        }
        if let Some(output) = self.log_output {
            logging.output = output;
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Convert JMI data between shapes (flat -> map, flat -> tree)
    Convert {
        /// Source shape (flat, map, tree or 1-3)
        #[arg(long)]
        from: Shape,
        /// Target shape (flat, map, tree or 1-3)
        #[arg(long)]
        to: Shape,
        /// Input JSON file, or "-" for stdin
        #[arg(long, default_value = "-")]
        input: String,
        /// Field supplying record keys
        #[arg(long)]
        key_field: Option<String>,
        /// Field read from embedded parent objects
        #[arg(long)]
        unique_field: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the containment tree of flat JMI data as an indented outline
    Outline {
        /// Input JSON file, or "-" for stdin
        #[arg(long, default_value = "-")]
        input: String,
        /// Field supplying record keys
        #[arg(long)]
        key_field: Option<String>,
        /// Field read from embedded parent objects
        #[arg(long)]
        unique_field: Option<String>,
    },
}

impl Commands {
    fn input(&self) -> &str {
        match self {
            Commands::Convert { input, .. } | Commands::Outline { input, .. } => input,
        }
    }
}

/// CLI context holding the resolved configuration
pub struct CliContext {
    config: JmiConfig,
}

impl CliContext {
    /// Load configuration from `config_path`, or from the standard sources.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(&path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self { config })
    }

    pub fn with_config(config: JmiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JmiConfig {
        &self.config
    }

    /// Execute a command, reading its input from the named file or stdin.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let input = read_input(command.input())?;
        self.execute_with_input(command, &input)
    }

    /// Execute a command against JSON text already in memory.
    pub fn execute_with_input(&self, command: &Commands, input: &str) -> Result<String, ApiError> {
        let data: Value = serde_json::from_str(input)?;

        match command {
            Commands::Convert {
                from,
                to,
                key_field,
                unique_field,
                pretty,
                ..
            } => {
                let options = self.options(key_field, unique_field);
                let converted = convert(*from, *to, data, &options)?;
                let value = converted.into_value();
                let output = if *pretty {
                    serde_json::to_string_pretty(&value)?
                } else {
                    serde_json::to_string(&value)?
                };
                Ok(output)
            }
            Commands::Outline {
                key_field,
                unique_field,
                ..
            } => {
                let options = self.options(key_field, unique_field);
                let converted = convert(Shape::Flat, Shape::Tree, data, &options)?;
                Ok(format_outline(&converted))
            }
        }
    }

    fn options(&self, key_field: &Option<String>, unique_field: &Option<String>) -> ConvertOptions {
        let mut options = self.config.conversion.options();
        if let Some(field) = key_field {
            options.key_field = field.clone();
        }
        if let Some(field) = unique_field {
            options.unique_field = field.clone();
        }
        options
    }
}

fn read_input(input: &str) -> Result<String, ApiError> {
    if input == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    info!(path = input, "reading JMI input");
    std::fs::read_to_string(input)
        .map_err(|e| ApiError::Io(format!("Failed to read {}: {}", input, e)))
}

/// Render a tree as one key per line, indented two spaces per level.
/// Unresolved placeholders are prefixed with `? `.
pub fn format_outline(converted: &Converted) -> String {
    walk(converted.as_map())
        .map(|entry| {
            let marker = if entry.record.is_some() { "" } else { "? " };
            format!("{:indent$}{}{}", "", marker, entry.key, indent = entry.depth * 2)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
