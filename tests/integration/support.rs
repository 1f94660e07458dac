use jmi::engine::walk;
use jmi::{JmiMap, Record};
use serde_json::{json, Value};

/// Build a flat record with the standard field names.
pub fn record(id: &str, parent: Option<&str>, contains: &[&str]) -> Value {
    json!({
        "id": id,
        "name": format!("Element {}", id),
        "parent": parent,
        "contains": contains,
    })
}

/// Flat records for a forest where `parents[i]` is the parent index of node i.
/// Parent indices always point backwards, so the result is acyclic.
pub fn forest(parents: &[Option<usize>]) -> Vec<Value> {
    let ids: Vec<String> = (0..parents.len()).map(|i| format!("n{}", i)).collect();
    let mut children: Vec<Vec<&str>> = vec![Vec::new(); parents.len()];
    for (i, parent) in parents.iter().enumerate() {
        if let Some(p) = parent {
            children[*p].push(&ids[i]);
        }
    }
    parents
        .iter()
        .enumerate()
        .map(|(i, parent)| record(&ids[i], parent.map(|p| ids[p].as_str()), &children[i]))
        .collect()
}

/// Every record reachable in a tree, with `contains` removed.
pub fn flatten(tree: &JmiMap) -> Vec<(String, Record)> {
    walk(tree)
        .filter_map(|entry| {
            entry.record.map(|record| {
                let mut record = record.clone();
                record.remove("contains");
                (entry.key.to_string(), record)
            })
        })
        .collect()
}

pub fn without_contains(value: &Value) -> Record {
    let mut record = value.as_object().cloned().unwrap_or_default();
    record.remove("contains");
    record
}
