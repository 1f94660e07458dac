use jmi::engine::{to_map, to_tree, walk};
use jmi::types::DEFAULT_MAX_DEPTH;
use jmi::ConvertError;
use proptest::prelude::*;
use proptest::sample::Index;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::integration::support::{flatten, forest, record, without_contains};

/// Parent index per node; node 0 is always a root and every parent index
/// points to an earlier node.
fn parents_strategy() -> impl Strategy<Value = Vec<Option<usize>>> {
    prop::collection::vec((any::<bool>(), any::<Index>()), 1..40).prop_map(|picks| {
        picks
            .into_iter()
            .enumerate()
            .map(|(i, (is_root, index))| {
                if i == 0 || is_root {
                    None
                } else {
                    Some(index.index(i))
                }
            })
            .collect()
    })
}

fn ids(records: &[Value]) -> BTreeSet<String> {
    records
        .iter()
        .map(|r| r["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

proptest! {
    #[test]
    fn map_keys_match_record_keys(parents in parents_strategy()) {
        let records = forest(&parents);
        let map = to_map(Value::Array(records.clone()), "id").unwrap();

        let keys: BTreeSet<String> = map.keys().cloned().collect();
        prop_assert_eq!(keys, ids(&records));
        for r in &records {
            let key = r["id"].as_str().unwrap();
            prop_assert_eq!(&map[key], r);
        }
    }

    #[test]
    fn map_is_idempotent(parents in parents_strategy()) {
        let records = Value::Array(forest(&parents));
        let first = to_map(records.clone(), "id").unwrap();
        let second = to_map(records, "id").unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn any_duplicate_key_is_rejected(parents in parents_strategy(), pick in any::<Index>()) {
        let mut records = forest(&parents);
        let duplicate = records[pick.index(records.len())].clone();
        records.push(duplicate);

        let result = to_map(Value::Array(records), "id");
        prop_assert!(
            matches!(result, Err(ConvertError::InvalidFormat(ref msg)) if msg.contains("duplicate keys")),
            "duplicate key was accepted"
        );
    }

    #[test]
    fn tree_roots_are_exactly_parentless_records(parents in parents_strategy()) {
        let records = forest(&parents);
        let tree = to_tree(Value::Array(records.clone()), "id", "id").unwrap();

        let roots: BTreeSet<String> = tree.keys().cloned().collect();
        let expected: BTreeSet<String> = parents
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_none())
            .map(|(i, _)| format!("n{}", i))
            .collect();
        prop_assert_eq!(roots, expected);
    }

    #[test]
    fn every_record_nested_once_under_its_parent(parents in parents_strategy()) {
        let records = forest(&parents);
        let tree = to_tree(Value::Array(records), "id", "id").unwrap();

        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        let mut path: Vec<String> = Vec::new();
        for entry in walk(&tree) {
            prop_assert!(entry.record.is_some(), "placeholder left for {}", entry.key);
            path.truncate(entry.depth);
            let index: usize = entry.key[1..].parse().unwrap();
            let expected_parent = parents[index].map(|p| format!("n{}", p));
            prop_assert_eq!(path.last().cloned(), expected_parent);
            path.push(entry.key.to_string());
            *seen.entry(entry.key.to_string()).or_default() += 1;
        }
        prop_assert_eq!(seen.len(), parents.len());
        prop_assert!(seen.values().all(|count| *count == 1));
    }

    #[test]
    fn flattening_tree_recovers_input(parents in parents_strategy()) {
        let records = forest(&parents);
        let tree = to_tree(Value::Array(records.clone()), "id", "id").unwrap();

        let mut recovered = flatten(&tree);
        recovered.sort_by(|a, b| a.0.cmp(&b.0));
        let mut original: Vec<(String, _)> = records
            .iter()
            .map(|r| (r["id"].as_str().unwrap().to_string(), without_contains(r)))
            .collect();
        original.sort_by(|a, b| a.0.cmp(&b.0));
        prop_assert_eq!(recovered, original);
    }

    #[test]
    fn parent_links_alone_build_the_same_tree(parents in parents_strategy()) {
        let records = forest(&parents);
        let unlisted: Vec<Value> = records
            .iter()
            .map(|r| {
                let mut r = r.clone();
                r["contains"] = Value::Array(Vec::new());
                r
            })
            .collect();

        let expected = to_tree(Value::Array(records), "id", "id").unwrap();
        let tree = to_tree(Value::Array(unlisted), "id", "id").unwrap();
        prop_assert_eq!(tree, expected);
    }

    #[test]
    fn chains_past_the_depth_limit_are_rejected(extra in 1usize..64) {
        let depth = DEFAULT_MAX_DEPTH + extra;
        let parents: Vec<Option<usize>> =
            (0..depth).map(|i| i.checked_sub(1)).collect();

        let result = to_tree(Value::Array(forest(&parents)), "id", "id");
        prop_assert!(
            matches!(result, Err(ConvertError::InvalidFormat(ref msg)) if msg.contains("levels deep")),
            "chain of {} records was accepted",
            depth
        );
    }

    #[test]
    fn cycle_anywhere_is_rejected(parents in parents_strategy()) {
        let mut records = forest(&parents);
        records.push(record("cycle-a", Some("cycle-b"), &["cycle-b"]));
        records.push(record("cycle-b", Some("cycle-a"), &["cycle-a"]));

        let result = to_tree(Value::Array(records), "id", "id");
        prop_assert!(
            matches!(result, Err(ConvertError::InvalidFormat(ref msg)) if msg.contains("circular reference")),
            "cycle was accepted"
        );
    }
}
