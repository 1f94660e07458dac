//! Tooling & Integration Layer
//!
//! Command-line access to the conversion engine for scripts and operators.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
