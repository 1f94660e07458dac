//! JMI: JSON Model Interchange
//!
//! Converts flat collections of parent-linked records into a keyed lookup map
//! or a nested containment tree, rejecting duplicate keys and circular
//! references along the way.

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod tooling;
pub mod types;

pub use error::{ApiError, ConvertError};
pub use engine::{convert, Converted};
pub use types::{ConvertOptions, JmiMap, Record, Shape};
