//! Core types for JSON Model Interchange conversions.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Record: one opaque JSON object in a hierarchy
pub type Record = Map<String, Value>;

/// JmiMap: key -> Record, used for both the map and the tree shapes
pub type JmiMap = Map<String, Value>;

/// Default field supplying record keys
pub const DEFAULT_KEY_FIELD: &str = "id";

/// Field holding the parent reference
pub const PARENT_FIELD: &str = "parent";

/// Field holding the child keys
pub const CONTAINS_FIELD: &str = "contains";

/// Deepest hierarchy, in records from root to leaf, accepted by default
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Interchange shape. Ordered: Flat < Map < Tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Flat = 1,
    Map = 2,
    Tree = 3,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Flat => "flat",
            Shape::Map => "map",
            Shape::Tree => "tree",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), *self as u8)
    }
}

impl TryFrom<u8> for Shape {
    type Error = ConvertError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Shape::Flat),
            2 => Ok(Shape::Map),
            3 => Ok(Shape::Tree),
            other => Err(ConvertError::InvalidFormat(format!(
                "unknown JMI shape: {}",
                other
            ))),
        }
    }
}

impl FromStr for Shape {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "flat" => Ok(Shape::Flat),
            "2" | "map" => Ok(Shape::Map),
            "3" | "tree" => Ok(Shape::Tree),
            other => Err(ConvertError::InvalidFormat(format!(
                "unknown JMI shape: '{}' (expected flat, map, tree or 1-3)",
                other
            ))),
        }
    }
}

/// Field names and limits used by a conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Attribute supplying the map key
    pub key_field: String,
    /// Attribute read from embedded parent objects
    pub unique_field: String,
    /// Longest parent chain a tree conversion accepts
    pub max_depth: usize,
}

impl ConvertOptions {
    pub fn new(key_field: impl Into<String>, unique_field: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
            unique_field: unique_field.into(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_FIELD, DEFAULT_KEY_FIELD)
    }
}

/// Render a JSON scalar usable as a key.
///
/// Strings are taken as-is and numbers use their JSON text. Every other type
/// yields `None`.
pub fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
