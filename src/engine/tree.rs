//! Tree Assembler
//!
//! Builds a nested containment tree from a JMI map. Leaves are promoted into
//! their parents' `contains` objects one level per pass until only roots are
//! left at the top level. Structural violations are detected by a sweep over
//! the remaining top-level records once promotion is finished.

use crate::engine::map::{json_type_name, to_map};
use crate::error::ConvertError;
use crate::types::{
    key_string, JmiMap, Record, CONTAINS_FIELD, DEFAULT_MAX_DEPTH, PARENT_FIELD,
};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Outcome of a tree assembly
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Roots keyed by their keys, with descendants nested under `contains`
    pub tree: JmiMap,
    /// Number of promotion passes performed
    pub passes: usize,
    /// Number of records moved under a parent
    pub promoted: usize,
}

/// Convert flat JMI data into a tree, rejecting hierarchies deeper than
/// [`DEFAULT_MAX_DEPTH`].
pub fn to_tree(data: Value, key_field: &str, unique_field: &str) -> Result<JmiMap, ConvertError> {
    to_tree_with_limit(data, key_field, unique_field, DEFAULT_MAX_DEPTH)
}

/// Convert flat JMI data into a tree no deeper than `max_depth` levels.
pub fn to_tree_with_limit(
    data: Value,
    key_field: &str,
    unique_field: &str,
    max_depth: usize,
) -> Result<JmiMap, ConvertError> {
    let map = to_map(data, key_field)?;
    assemble_bounded(map, unique_field, max_depth).map(|assembly| assembly.tree)
}

/// Assemble a tree from a map, discarding the pass statistics.
pub fn assemble(map: JmiMap, unique_field: &str) -> Result<JmiMap, ConvertError> {
    assemble_with_report(map, unique_field).map(|assembly| assembly.tree)
}

/// Assemble a tree from a map with the default depth limit.
pub fn assemble_with_report(map: JmiMap, unique_field: &str) -> Result<Assembly, ConvertError> {
    assemble_bounded(map, unique_field, DEFAULT_MAX_DEPTH)
}

/// Assemble a tree from a map.
///
/// Every record must carry `parent` and `contains`, and no parent chain may
/// be longer than `max_depth`; both are checked for the whole batch before
/// any record is touched. Nested `serde_json` values are dropped and
/// serialized recursively, so the depth bound is what keeps the result safe
/// to hand to callers.
///
/// The map is consumed: its records' `contains` arrays are rewritten into
/// objects mapping each child key to the nested child record, or to the bare
/// key while unresolved. A record naming a parent that does not list it is
/// added to that parent's `contains` before promotion starts.
pub fn assemble_bounded(
    mut working: JmiMap,
    unique_field: &str,
    max_depth: usize,
) -> Result<Assembly, ConvertError> {
    check_required_fields(&working)?;

    let mut parents: HashMap<String, Option<String>> = HashMap::with_capacity(working.len());
    for (key, value) in &working {
        let parent = value.get(PARENT_FIELD).unwrap_or(&Value::Null);
        let parent_key = resolve_parent(parent, unique_field).map_err(|reason| {
            ConvertError::InvalidFormat(format!("record '{}': {}", key, reason))
        })?;
        parents.insert(key.clone(), parent_key);
    }

    if let Some((depth, key)) = deepest_chain(&parents) {
        if depth > max_depth {
            warn!(record = %key, depth, max_depth, "hierarchy too deep");
            return Err(ConvertError::InvalidFormat(format!(
                "record '{}' is nested {} levels deep, exceeding the limit of {}",
                key, depth, max_depth
            )));
        }
    }

    normalize_contains(&mut working)?;
    adopt_unlisted_children(&mut working, &parents)?;
    let mut frontier: Vec<String> = working
        .iter()
        .filter(|(_, value)| {
            value
                .get(CONTAINS_FIELD)
                .and_then(Value::as_object)
                .map_or(false, |contains| contains.is_empty())
        })
        .map(|(key, _)| key.clone())
        .collect();
    let mut passes = 0;
    let mut promoted = 0;

    while !frontier.is_empty() {
        passes += 1;
        frontier.sort();
        frontier.dedup();
        debug!(pass = passes, frontier = frontier.len(), "promoting frontier");

        let mut next = Vec::new();
        for key in frontier {
            let parent_key = match parents.get(&key) {
                Some(Some(parent_key)) if *parent_key != key => parent_key,
                _ => continue,
            };
            if !working.contains_key(parent_key) {
                continue;
            }
            let child = match working.remove(&key) {
                Some(child) => child,
                None => continue,
            };

            let contains = contains_object_mut(&mut working, parent_key)?;
            contains.insert(key, child);
            promoted += 1;

            if is_resolved(contains) {
                let has_live_parent = matches!(
                    parents.get(parent_key),
                    Some(Some(grandparent)) if working.contains_key(grandparent)
                );
                if has_live_parent {
                    next.push(parent_key.clone());
                }
            }
        }
        frontier = next;
    }

    check_top_level(&working, &parents)?;

    debug!(
        roots = working.len(),
        passes, promoted, "assembled JMI tree"
    );
    Ok(Assembly {
        tree: working,
        passes,
        promoted,
    })
}

/// Resolve a parent reference to a key.
///
/// Accepts a key (string or number), an embedded parent object whose key is
/// read from `unique_field`, or `null` for a root.
pub fn resolve_parent(parent: &Value, unique_field: &str) -> Result<Option<String>, String> {
    match parent {
        Value::Null => Ok(None),
        Value::String(_) | Value::Number(_) => Ok(key_string(parent)),
        Value::Object(object) => object
            .get(unique_field)
            .and_then(key_string)
            .map(Some)
            .ok_or_else(|| {
                format!(
                    "parent object has no usable '{}' field",
                    unique_field
                )
            }),
        other => Err(format!(
            "parent must be a key, an object or null (found {})",
            json_type_name(other)
        )),
    }
}

fn check_required_fields(map: &JmiMap) -> Result<(), ConvertError> {
    for (key, value) in map {
        let record = value.as_object().ok_or_else(|| {
            ConvertError::InvalidFormat(format!("record '{}' is not an object", key))
        })?;
        for field in [CONTAINS_FIELD, PARENT_FIELD] {
            if !record.contains_key(field) {
                return Err(ConvertError::InvalidFormat(format!(
                    "record '{}' is missing required field '{}'",
                    key, field
                )));
            }
        }
    }
    Ok(())
}

/// Rewrite every `contains` array into an object of placeholders.
fn normalize_contains(working: &mut JmiMap) -> Result<(), ConvertError> {
    for (key, value) in working.iter_mut() {
        let record = record_mut(key, value)?;
        let children = match record.get(CONTAINS_FIELD) {
            Some(Value::Array(children)) => children,
            Some(other) => {
                return Err(ConvertError::InvalidFormat(format!(
                    "record '{}': '{}' must be an array (found {})",
                    key,
                    CONTAINS_FIELD,
                    json_type_name(other)
                )))
            }
            None => {
                return Err(ConvertError::InvalidFormat(format!(
                    "record '{}' is missing required field '{}'",
                    key, CONTAINS_FIELD
                )))
            }
        };

        let mut placeholders = Map::new();
        for child in children {
            let child_key = key_string(child).ok_or_else(|| {
                ConvertError::InvalidFormat(format!(
                    "record '{}': child keys must be strings or numbers (found {})",
                    key,
                    json_type_name(child)
                ))
            })?;
            placeholders.insert(child_key.clone(), Value::String(child_key));
        }
        record.insert(CONTAINS_FIELD.to_string(), Value::Object(placeholders));
    }

    Ok(())
}

/// Give every record a placeholder in its parent's `contains`, so a parent
/// never counts as resolved while one of its children is still waiting.
fn adopt_unlisted_children(
    working: &mut JmiMap,
    parents: &HashMap<String, Option<String>>,
) -> Result<(), ConvertError> {
    let mut keys: Vec<&String> = parents.keys().collect();
    keys.sort();

    for child in keys {
        let parent_key = match parents.get(child) {
            Some(Some(parent_key)) if parent_key != child && working.contains_key(parent_key) => {
                parent_key
            }
            _ => continue,
        };
        let contains = contains_object_mut(working, parent_key)?;
        if !contains.contains_key(child) {
            debug!(record = %child, parent = %parent_key, "adding unlisted child");
            contains.insert(child.clone(), Value::String(child.clone()));
        }
    }
    Ok(())
}

/// Longest parent chain in the batch, counted in records, with the key at
/// its bottom. A chain that loops is counted up to its first repeated key.
fn deepest_chain(parents: &HashMap<String, Option<String>>) -> Option<(usize, &str)> {
    let mut depths: HashMap<&str, usize> = HashMap::with_capacity(parents.len());
    let mut deepest: Option<(usize, &str)> = None;

    for start in parents.keys() {
        if depths.contains_key(start.as_str()) {
            continue;
        }

        let mut path: Vec<&str> = Vec::new();
        let mut on_path: HashSet<&str> = HashSet::new();
        let mut cursor = start.as_str();
        let base = loop {
            if let Some(depth) = depths.get(cursor) {
                break *depth;
            }
            if !on_path.insert(cursor) {
                break 0;
            }
            path.push(cursor);
            match parents.get(cursor) {
                Some(Some(parent)) if parents.contains_key(parent) => cursor = parent.as_str(),
                _ => break 0,
            }
        };

        for (offset, &key) in path.iter().rev().enumerate() {
            let depth = base + offset + 1;
            depths.insert(key, depth);
            if deepest.map_or(true, |(max, _)| depth > max) {
                deepest = Some((depth, key));
            }
        }
    }

    deepest
}

/// Fail if any top-level record still has a parent among the input records.
fn check_top_level(
    working: &JmiMap,
    parents: &HashMap<String, Option<String>>,
) -> Result<(), ConvertError> {
    for (key, value) in working {
        let parent_key = match parents.get(key) {
            Some(Some(parent_key)) if parents.contains_key(parent_key) => parent_key,
            _ => continue,
        };

        let dangling = value
            .get(CONTAINS_FIELD)
            .and_then(Value::as_object)
            .and_then(|contains| {
                contains
                    .iter()
                    .find(|(child, slot)| slot.is_string() && !parents.contains_key(*child))
                    .map(|(child, _)| child.clone())
            });

        if let Some(child) = dangling {
            warn!(record = %key, child = %child, "unknown child reference");
            return Err(ConvertError::InvalidFormat(format!(
                "record '{}' contains unknown child '{}'",
                key, child
            )));
        }

        warn!(record = %key, parent = %parent_key, "circular reference");
        return Err(ConvertError::InvalidFormat(format!(
            "circular reference exists: '{}' has parent '{}' but remains at the top level",
            key, parent_key
        )));
    }
    Ok(())
}

fn is_resolved(contains: &Map<String, Value>) -> bool {
    contains.values().all(Value::is_object)
}

fn record_mut<'a>(key: &str, value: &'a mut Value) -> Result<&'a mut Record, ConvertError> {
    value
        .as_object_mut()
        .ok_or_else(|| ConvertError::InvalidFormat(format!("record '{}' is not an object", key)))
}

fn contains_object_mut<'a>(
    working: &'a mut JmiMap,
    key: &str,
) -> Result<&'a mut Map<String, Value>, ConvertError> {
    working
        .get_mut(key)
        .and_then(Value::as_object_mut)
        .and_then(|record| record.get_mut(CONTAINS_FIELD))
        .and_then(Value::as_object_mut)
        .ok_or_else(|| {
            ConvertError::InvalidFormat(format!(
                "record '{}' has no normalized '{}' object",
                key, CONTAINS_FIELD
            ))
        })
}
