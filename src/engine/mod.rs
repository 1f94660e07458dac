//! JMI Conversion Engine
//!
//! Converts flat, parent-linked record collections into a keyed map or a
//! nested containment tree. Only flat input is accepted; the tree is always
//! derived from the map.

pub mod map;
pub mod tree;
pub mod walk;

pub use map::{records_to_map, to_map};
pub use tree::{
    assemble, assemble_bounded, assemble_with_report, to_tree, to_tree_with_limit, Assembly,
};
pub use walk::{walk, Walk, WalkEntry};

use crate::error::ConvertError;
use crate::types::{ConvertOptions, JmiMap, Shape};
use serde_json::Value;
use tracing::info;

/// Result of a conversion
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    Map(JmiMap),
    Tree(JmiMap),
}

impl Converted {
    pub fn shape(&self) -> Shape {
        match self {
            Converted::Map(_) => Shape::Map,
            Converted::Tree(_) => Shape::Tree,
        }
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.as_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_map().is_empty()
    }

    pub fn as_map(&self) -> &JmiMap {
        match self {
            Converted::Map(map) | Converted::Tree(map) => map,
        }
    }

    pub fn into_map(self) -> JmiMap {
        match self {
            Converted::Map(map) | Converted::Tree(map) => map,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.into_map())
    }
}

/// Convert `data` from the `source` shape to the `target` shape.
///
/// Supported routes are flat to map and flat to tree. The data is consumed;
/// clone it first if the original records are still needed.
pub fn convert(
    source: Shape,
    target: Shape,
    data: Value,
    options: &ConvertOptions,
) -> Result<Converted, ConvertError> {
    let converted = match (source, target) {
        (Shape::Flat, Shape::Map) => Converted::Map(to_map(data, &options.key_field)?),
        (Shape::Flat, Shape::Tree) => Converted::Tree(to_tree_with_limit(
            data,
            &options.key_field,
            &options.unique_field,
            options.max_depth,
        )?),
        (source, target) => {
            return Err(ConvertError::NotImplemented(format!(
                "JMI conversion from {} to {} is not supported",
                source, target
            )))
        }
    };

    info!(
        from = source.as_str(),
        to = target.as_str(),
        entries = converted.len(),
        "JMI conversion complete"
    );
    Ok(converted)
}
