//! In-memory ordered store.

use super::{Entry, Member, NamespaceStore};
use crate::error::NamespaceError;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Ordered map store used for tests and the `memory` cluster backend.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    members: Vec<Member>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members(members: Vec<Member>) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            members,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl NamespaceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, NamespaceError> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| NamespaceError::not_found(key))
    }

    fn put(&self, key: &str, value: &[u8], must_not_exist: bool) -> Result<(), NamespaceError> {
        let mut entries = self.entries.write();
        if must_not_exist && entries.contains_key(key) {
            return Err(NamespaceError::already_exists(key));
        }
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), NamespaceError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<Entry>, NamespaceError> {
        let entries = self.entries.read();
        Ok(entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn list_members(&self) -> Result<Vec<Member>, NamespaceError> {
        Ok(self.members.clone())
    }
}
