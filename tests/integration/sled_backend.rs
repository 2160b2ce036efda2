use kvdir::config::{ClusterConfig, KvdirConfig, StoreBackend};
use kvdir::store::{NamespaceStore, SledStore};
use kvdir::{ConnectionRegistry, NamespaceApi, WriteMode};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn namespace_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("store");
    {
        let store = Arc::new(SledStore::open(&db_path, Vec::new()).unwrap());
        let api = NamespaceApi::new(store.clone());
        api.write("/svc/api/port", "8080", WriteMode::Create).unwrap();
        api.write("/svc/api/host", "0.0.0.0", WriteMode::Create).unwrap();
        store.flush().unwrap();
    }

    let store = Arc::new(SledStore::open(&db_path, Vec::new()).unwrap());
    let api = NamespaceApi::new(store);
    assert!(api.read("/svc").unwrap().is_dir());
    let doc: Value = serde_json::from_str(&api.format_path("/svc", "json").unwrap()).unwrap();
    assert_eq!(doc, json!({"api": {"host": "0.0.0.0", "port": "8080"}}));
}

#[test]
fn sled_create_is_atomic_against_existing_keys() {
    let store = SledStore::temporary().unwrap();
    store.put("/k", b"1", true).unwrap();
    assert!(store.put("/k", b"2", true).unwrap_err().is_already_exists());
    assert_eq!(store.get("/k").unwrap(), b"1".to_vec());
}

#[test]
fn registry_opens_sled_cluster_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = KvdirConfig::default();
    config.default_cluster = "disk".to_string();
    config.clusters = vec![ClusterConfig::new(
        "disk",
        StoreBackend::Sled {
            path: Some(temp_dir.path().join("disk")),
        },
    )];

    let registry = ConnectionRegistry::from_config(&config).unwrap();
    let api = registry.open(None, "").unwrap();
    api.create_dir("/d").unwrap();
    let again = registry.open(Some("disk"), "").unwrap();
    assert!(again.read("/d").unwrap().is_dir());
    assert_eq!(again.list("/").unwrap().len(), 1);
}
