//! Non-recursive delete of a directory leaves its descendants in the store.
//! When a directory marker remains below the deleted path they stay reachable
//! through `scan_prefix` only.

use crate::support::{keys, memory_api};
use kvdir::store::NamespaceStore;
use kvdir::WriteMode;
use serde_json::{json, Value};

fn orphaned() -> (std::sync::Arc<kvdir::store::MemoryStore>, kvdir::NamespaceApi) {
    let (store, api) = memory_api();
    api.write("/a/b/c", "v", WriteMode::Create).unwrap();
    api.write("/keep", "k", WriteMode::Create).unwrap();
    assert_eq!(api.delete("/a", false).unwrap(), 1);
    (store, api)
}

#[test]
fn orphans_remain_in_store() {
    let (store, _) = orphaned();
    assert_eq!(
        keys(&store.scan_prefix("/a").unwrap()),
        vec!["/a/b", "/a/b/c"]
    );
}

#[test]
fn orphans_hidden_from_listing_above() {
    let (_, api) = orphaned();
    let names: Vec<String> = api
        .list("/")
        .unwrap()
        .iter()
        .map(|n| n.full_path().to_string())
        .collect();
    assert_eq!(names, vec!["/keep"]);
}

#[test]
fn orphans_hidden_from_recursive_value_above() {
    let (_, api) = orphaned();
    let root = api.get_recursive_value("/").unwrap();
    assert_eq!(root.count(), 2);
    let doc: Value = serde_json::from_str(&api.format_tree(&root, "json").unwrap()).unwrap();
    assert_eq!(doc, json!({"keep": "k"}));
}

#[test]
fn deleted_directory_reads_not_found() {
    let (_, api) = orphaned();
    assert!(api.read("/a").unwrap_err().is_not_found());
    // Point reads of the orphans themselves still hit the store.
    assert_eq!(api.read("/a/b/c").unwrap().value(), "v");
}

#[test]
fn orphan_subtree_visible_when_queried_directly() {
    let (_, api) = orphaned();
    let listing = api.list("/a").unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].full_path(), "/a/b");
    assert!(listing[0].is_dir());
}

#[test]
fn recursive_delete_clears_orphans() {
    let (store, api) = orphaned();
    api.delete("/a", true).unwrap();
    assert!(store.scan_prefix("/a").unwrap().is_empty());
    assert!(api.list("/a").unwrap().is_empty());
}

#[test]
fn rewriting_restores_visibility() {
    let (_, api) = orphaned();
    api.write("/a/b/d", "w", WriteMode::Create).unwrap();
    let doc: Value = serde_json::from_str(&api.format_path("/", "json").unwrap()).unwrap();
    assert_eq!(doc, json!({"a": {"b": {"c": "v", "d": "w"}}, "keep": "k"}));
}

/// With no directory marker left below it, a non-recursively deleted
/// directory cannot be told apart from a never-materialized subtree, so its
/// leaf descendants reappear under a synthesized directory.
#[test]
fn leaf_only_orphans_are_resynthesized() {
    let (store, api) = memory_api();
    api.write("/cfg/host", "h", WriteMode::Create).unwrap();
    api.write("/cfg/port", "p", WriteMode::Create).unwrap();
    assert_eq!(api.delete("/cfg", false).unwrap(), 1);

    assert!(api.read("/cfg").unwrap_err().is_not_found());
    assert_eq!(
        keys(&store.scan_prefix("/cfg").unwrap()),
        vec!["/cfg/host", "/cfg/port"]
    );

    let listing = api.list("/").unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].full_path(), "/cfg");
    assert!(listing[0].is_dir());
    assert!(!listing[0].materialized);

    let doc: Value = serde_json::from_str(&api.format_path("/", "json").unwrap()).unwrap();
    assert_eq!(doc, json!({"cfg": {"host": "h", "port": "p"}}));
}
