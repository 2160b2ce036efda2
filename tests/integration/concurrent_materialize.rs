use kvdir::store::{MemoryStore, NamespaceStore, SledStore};
use kvdir::types::DEFAULT_DIR_VALUE;
use kvdir::{NamespaceApi, WriteMode};
use std::sync::{Arc, Barrier};
use std::thread;

fn race_writers(store: Arc<dyn NamespaceStore>) {
    const WRITERS: usize = 8;
    let barrier = Arc::new(Barrier::new(WRITERS));
    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let api = NamespaceApi::new(Arc::clone(&store));
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                api.write(&format!("/shared/deep/w{}", i), "v", WriteMode::Create)
                    .unwrap()
            })
        })
        .collect();

    let reports: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for dir in ["/", "/shared", "/shared/deep"] {
        let created = reports
            .iter()
            .filter(|r| r.created.iter().any(|p| p.as_str() == dir))
            .count();
        assert_eq!(created, 1, "{} created exactly once", dir);
        assert_eq!(store.get(dir).unwrap(), DEFAULT_DIR_VALUE.as_bytes());
    }

    let api = NamespaceApi::new(store);
    assert_eq!(api.list("/shared/deep").unwrap().len(), WRITERS);
}

#[test]
fn concurrent_writers_share_ancestors_in_memory() {
    race_writers(Arc::new(MemoryStore::new()));
}

#[test]
fn concurrent_writers_share_ancestors_in_sled() {
    race_writers(Arc::new(SledStore::temporary().unwrap()));
}
