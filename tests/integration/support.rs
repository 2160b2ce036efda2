use kvdir::error::NamespaceError;
use kvdir::store::{Entry, Member, MemoryStore, NamespaceStore};
use kvdir::NamespaceApi;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub fn memory_api() -> (Arc<MemoryStore>, NamespaceApi) {
    let store = Arc::new(MemoryStore::new());
    let api = NamespaceApi::new(store.clone());
    (store, api)
}

pub fn keys(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(|(k, _)| k.as_str()).collect()
}

/// Memory store that can be switched into a failing state
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    down: AtomicBool,
    fail_writes_only: AtomicBool,
}

impl FlakyStore {
    pub fn fail_all(&self) {
        self.down.store(true, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes_only.store(true, Ordering::SeqCst);
    }

    fn check(&self, key: &str, write: bool) -> Result<(), NamespaceError> {
        if self.down.load(Ordering::SeqCst) || (write && self.fail_writes_only.load(Ordering::SeqCst))
        {
            return Err(NamespaceError::unavailable(key, "connection refused"));
        }
        Ok(())
    }
}

impl NamespaceStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, NamespaceError> {
        self.check(key, false)?;
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &[u8], must_not_exist: bool) -> Result<(), NamespaceError> {
        self.check(key, true)?;
        self.inner.put(key, value, must_not_exist)
    }

    fn delete(&self, key: &str) -> Result<(), NamespaceError> {
        self.check(key, true)?;
        self.inner.delete(key)
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<Entry>, NamespaceError> {
        self.check(prefix, false)?;
        self.inner.scan_prefix(prefix)
    }

    fn list_members(&self) -> Result<Vec<Member>, NamespaceError> {
        self.check("", false)?;
        self.inner.list_members()
    }
}
