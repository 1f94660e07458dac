//! Depth-first traversal of an assembled tree.

use crate::types::{JmiMap, Record, CONTAINS_FIELD};
use serde_json::Value;

/// One visited node
#[derive(Debug, Clone, PartialEq)]
pub struct WalkEntry<'a> {
    /// 0 for roots
    pub depth: usize,
    pub key: &'a str,
    /// `None` when the child is still an unresolved placeholder
    pub record: Option<&'a Record>,
}

/// Pre-order iterator over roots and their nested `contains` records.
pub struct Walk<'a> {
    stack: Vec<(usize, &'a str, &'a Value)>,
}

/// Walk a tree depth-first, visiting siblings in map order.
pub fn walk(tree: &JmiMap) -> Walk<'_> {
    Walk {
        stack: tree
            .iter()
            .rev()
            .map(|(key, value)| (0, key.as_str(), value))
            .collect(),
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = WalkEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, key, value) = self.stack.pop()?;
        let record = value.as_object();

        if let Some(children) = record
            .and_then(|r| r.get(CONTAINS_FIELD))
            .and_then(Value::as_object)
        {
            for (child_key, child) in children.iter().rev() {
                self.stack.push((depth + 1, child_key.as_str(), child));
            }
        }

        Some(WalkEntry { depth, key, record })
    }
}
