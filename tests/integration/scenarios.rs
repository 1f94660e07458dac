use jmi::engine::{assemble_with_report, to_map};
use jmi::{convert, ConvertError, ConvertOptions, Shape};
use serde_json::json;

use crate::integration::support::record;

#[test]
fn child_nests_under_declared_parent() {
    let data = json!([
        {"id": "a", "parent": "b", "contains": []},
        {"id": "b", "parent": null, "contains": ["a"]},
    ]);
    let tree = convert(Shape::Flat, Shape::Tree, data, &ConvertOptions::default())
        .unwrap()
        .into_value();

    assert_eq!(
        tree,
        json!({"b": {"id": "b", "parent": null, "contains": {
            "a": {"id": "a", "parent": "b", "contains": {}}
        }}})
    );
}

#[test]
fn duplicate_key_rejects_whole_batch() {
    let data = json!([
        {"id": "x", "contains": []},
        {"id": "x", "contains": []},
    ]);
    let result = convert(Shape::Flat, Shape::Map, data, &ConvertOptions::default());
    assert_eq!(
        result,
        Err(ConvertError::InvalidFormat(
            "duplicate keys exist: 'x'".to_string()
        ))
    );
}

#[test]
fn mutual_parents_report_circular_reference() {
    let data = json!([
        {"id": "p", "parent": "c", "contains": ["c"]},
        {"id": "c", "parent": "p", "contains": []},
    ]);
    let err = convert(Shape::Flat, Shape::Tree, data, &ConvertOptions::default()).unwrap_err();
    match err {
        ConvertError::InvalidFormat(msg) => assert!(msg.contains("circular reference exists")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn three_level_chain_needs_two_passes() {
    let data = json!([
        record("root", None, &["mid"]),
        record("mid", Some("root"), &["leaf"]),
        record("leaf", Some("mid"), &[]),
    ]);
    let assembly = assemble_with_report(to_map(data, "id").unwrap(), "id").unwrap();

    assert_eq!(assembly.passes, 2);
    assert_eq!(assembly.tree.len(), 1);
    assert_eq!(
        assembly.tree["root"]["contains"]["mid"]["contains"]["leaf"]["name"],
        json!("Element leaf")
    );
}

#[test]
fn missing_fields_fail_before_promotion() {
    let data = json!([
        record("root", None, &["leaf"]),
        {"id": "leaf", "contains": []},
    ]);
    let err = convert(Shape::Flat, Shape::Tree, data, &ConvertOptions::default()).unwrap_err();
    assert_eq!(
        err,
        ConvertError::InvalidFormat("record 'leaf' is missing required field 'parent'".to_string())
    );
}

#[test]
fn element_paths_keyed_by_full_id() {
    let data = json!([
        {"_id": "org:proj:master:model", "id": "model", "parent": null,
         "contains": ["org:proj:master:pkg"]},
        {"_id": "org:proj:master:pkg", "id": "pkg",
         "parent": {"id": "org:proj:master:model"},
         "contains": ["org:proj:master:block"]},
        {"_id": "org:proj:master:block", "id": "block",
         "parent": "org:proj:master:pkg", "contains": []},
    ]);
    let tree = convert(
        Shape::Flat,
        Shape::Tree,
        data,
        &ConvertOptions::new("_id", "id"),
    )
    .unwrap()
    .into_map();

    let pkg = &tree["org:proj:master:model"]["contains"]["org:proj:master:pkg"];
    assert_eq!(pkg["id"], json!("pkg"));
    assert_eq!(pkg["contains"]["org:proj:master:block"]["id"], json!("block"));
}

#[test]
fn reverse_and_identity_conversions_not_implemented() {
    for (source, target) in [
        (Shape::Map, Shape::Flat),
        (Shape::Tree, Shape::Map),
        (Shape::Map, Shape::Map),
        (Shape::Flat, Shape::Flat),
    ] {
        let result = convert(source, target, json!([]), &ConvertOptions::default());
        assert!(matches!(result, Err(ConvertError::NotImplemented(_))));
    }
}
