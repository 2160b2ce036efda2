use crate::support::{keys, memory_api};
use kvdir::store::NamespaceStore;
use kvdir::types::DEFAULT_DIR_VALUE;
use kvdir::WriteMode;
use serde_json::{json, Value};

#[test]
fn listing_excludes_grandchildren() {
    let (_, api) = memory_api();
    api.create_dir("/p").unwrap();
    api.write("/p/a", "leaf", WriteMode::Create).unwrap();
    api.create_dir("/p/b").unwrap();
    for i in 0..5 {
        api.write(&format!("/p/b/g{}", i), "x", WriteMode::Create)
            .unwrap();
    }
    api.write("/p/b/deep/er", "x", WriteMode::Create).unwrap();

    let nodes = api.list("/p").unwrap();
    let summary: Vec<(&str, bool)> = nodes.iter().map(|n| (n.full_path(), n.is_dir())).collect();
    assert_eq!(summary, vec![("/p/a", false), ("/p/b", true)]);
    assert!(nodes.iter().all(|n| n.children().is_empty()));
}

#[test]
fn recursive_value_formats_as_nested_json() {
    let (_, api) = memory_api();
    api.create_dir("/prefix").unwrap();
    api.write("/prefix/x", "1", WriteMode::Create).unwrap();
    api.write("/prefix/y/z", "2", WriteMode::Create).unwrap();

    let root = api.get_recursive_value("/prefix").unwrap();
    let out = api.format_tree(&root, "json").unwrap();
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed, json!({"x": "1", "y": {"z": "2"}}));
}

#[test]
fn unmaterialized_intermediates_are_tolerated() {
    let (store, api) = memory_api();
    // Written straight to the store, bypassing materialization.
    store.put("/cfg/net/port", b"80", false).unwrap();

    let root = api.get_recursive_value("/cfg").unwrap();
    assert!(root.is_dir());
    let net = &root.children()[0];
    assert_eq!(net.full_path(), "/cfg/net");
    assert!(net.is_dir());
    assert!(!net.materialized);
    assert_eq!(net.children()[0].value(), "80");

    let listing = api.list("/").unwrap();
    assert_eq!(listing[0].full_path(), "/cfg");
    assert!(listing[0].is_dir());
    // A point read does not infer anything.
    assert!(api.read("/cfg").unwrap_err().is_not_found());
}

#[test]
fn empty_subtree_formats_as_empty_container() {
    let (_, api) = memory_api();
    for format in ["json", "toml", "yaml"] {
        let out = api.format_path("/nowhere", format).unwrap();
        let parsed: Value = match format {
            "json" => serde_json::from_str(&out).unwrap(),
            "toml" => toml::from_str(&out).unwrap(),
            _ => serde_yaml::from_str(&out).unwrap(),
        };
        assert_eq!(parsed, json!({}), "format {}", format);
    }
}

#[test]
fn deleting_leaf_keeps_ancestors() {
    let (store, api) = memory_api();
    api.write("/a/b/c", "v", WriteMode::Create).unwrap();
    assert_eq!(api.delete("/a/b/c", false).unwrap(), 1);

    assert!(api.read("/a/b").unwrap().is_dir());
    assert!(api.read("/a").unwrap().is_dir());
    assert_eq!(keys(&store.scan_prefix("/").unwrap()), vec!["/", "/a", "/a/b"]);
    assert!(api.list("/a/b").unwrap().is_empty());
}

#[test]
fn write_materializes_root_and_every_ancestor() {
    let (store, api) = memory_api();
    let report = api.write("/x/y/z/leaf", "1", WriteMode::Create).unwrap();
    let created: Vec<&str> = report.created.iter().map(|p| p.as_str()).collect();
    assert_eq!(created, vec!["/", "/x", "/x/y", "/x/y/z"]);
    for dir in ["/", "/x", "/x/y", "/x/y/z"] {
        assert_eq!(store.get(dir).unwrap(), DEFAULT_DIR_VALUE.as_bytes());
    }
    let again = api.write("/x/y/z/other", "2", WriteMode::Create).unwrap();
    assert!(again.is_noop());
}

#[test]
fn leaf_ancestor_blocks_write() {
    let (_, api) = memory_api();
    api.write("/file", "contents", WriteMode::Create).unwrap();
    let err = api.write("/file/child", "x", WriteMode::Create).unwrap_err();
    assert!(matches!(err, kvdir::NamespaceError::NotADirectory { .. }));
}

#[test]
fn sibling_prefix_keys_stay_separate() {
    let (_, api) = memory_api();
    api.write("/a/x", "1", WriteMode::Create).unwrap();
    api.write("/a-b/y", "2", WriteMode::Create).unwrap();
    api.write("/ab", "3", WriteMode::Create).unwrap();

    let names: Vec<String> = api
        .list("/a")
        .unwrap()
        .iter()
        .map(|n| n.name().to_string())
        .collect();
    assert_eq!(names, vec!["x"]);

    let doc: Value = serde_json::from_str(&api.format_path("/", "json").unwrap()).unwrap();
    assert_eq!(doc, json!({"a": {"x": "1"}, "a-b": {"y": "2"}, "ab": "3"}));
}

#[test]
fn relative_and_trailing_slash_paths_are_canonicalized() {
    let (_, api) = memory_api();
    api.write("svc/name/", "api", WriteMode::Create).unwrap();
    assert_eq!(api.read("/svc/name").unwrap().value(), "api");
    assert_eq!(api.list("svc").unwrap()[0].full_path(), "/svc/name");
    assert!(api.read("/svc/../svc").is_err());
}
