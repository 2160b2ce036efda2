use crate::support::FlakyStore;
use kvdir::{NamespaceApi, NamespaceError, WriteMode};
use std::sync::Arc;

fn api() -> (Arc<FlakyStore>, NamespaceApi) {
    let store = Arc::new(FlakyStore::default());
    let api = NamespaceApi::new(store.clone());
    (store, api)
}

#[test]
fn unavailable_store_surfaces_on_reads() {
    let (store, api) = api();
    api.write("/a", "1", WriteMode::Create).unwrap();
    store.fail_all();

    for err in [
        api.list("/").unwrap_err(),
        api.read("/a").unwrap_err(),
        api.get_recursive_value("/").unwrap_err(),
        api.list_members().unwrap_err(),
    ] {
        assert!(matches!(err, NamespaceError::StoreUnavailable { .. }), "{:?}", err);
    }
}

#[test]
fn materialization_failure_names_the_ancestor() {
    let (store, api) = api();
    store.fail_writes();
    let err = api.write("/x/y", "1", WriteMode::Create).unwrap_err();
    assert!(matches!(err, NamespaceError::StoreUnavailable { .. }));
    assert_eq!(err.path(), Some("/"));
}

#[test]
fn not_found_is_distinct_from_unavailable() {
    let (_, api) = api();
    let err = api.read("/missing").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.path(), Some("/missing"));
}

#[test]
fn unsupported_format_does_not_touch_store() {
    let (store, api) = api();
    store.fail_all();
    let err = api.format_path("/", "xml").unwrap_err();
    assert!(matches!(err, NamespaceError::UnsupportedFormat(_)));
}
