//! Sled-backed persistent store.

use super::{Entry, Member, NamespaceStore};
use crate::error::NamespaceError;
use std::path::Path;

/// Persistent adapter over a sled tree.
///
/// Sled keeps keys in byte order and scans prefixes natively, which is all the
/// namespace core needs. Any sled failure is reported as `StoreUnavailable`.
pub struct SledStore {
    db: sled::Db,
    members: Vec<Member>,
}

impl SledStore {
    pub fn open(path: &Path, members: Vec<Member>) -> Result<Self, NamespaceError> {
        let db = sled::open(path)
            .map_err(|e| NamespaceError::unavailable(path.display().to_string(), e))?;
        Ok(Self { db, members })
    }

    /// Temporary database removed on drop; for tests and benches.
    pub fn temporary() -> Result<Self, NamespaceError> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| NamespaceError::unavailable("<temporary>", e))?;
        Ok(Self {
            db,
            members: Vec::new(),
        })
    }

    pub fn flush(&self) -> Result<(), NamespaceError> {
        self.db
            .flush()
            .map(|_| ())
            .map_err(|e| NamespaceError::unavailable("<flush>", e))
    }
}

impl NamespaceStore for SledStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, NamespaceError> {
        match self.db.get(key.as_bytes()) {
            Ok(Some(value)) => Ok(value.to_vec()),
            Ok(None) => Err(NamespaceError::not_found(key)),
            Err(e) => Err(NamespaceError::unavailable(key, e)),
        }
    }

    fn put(&self, key: &str, value: &[u8], must_not_exist: bool) -> Result<(), NamespaceError> {
        if must_not_exist {
            let swapped = self
                .db
                .compare_and_swap(key.as_bytes(), None as Option<&[u8]>, Some(value))
                .map_err(|e| NamespaceError::unavailable(key, e))?;
            return swapped.map_err(|_| NamespaceError::already_exists(key));
        }
        self.db
            .insert(key.as_bytes(), value)
            .map(|_| ())
            .map_err(|e| NamespaceError::unavailable(key, e))
    }

    fn delete(&self, key: &str) -> Result<(), NamespaceError> {
        self.db
            .remove(key.as_bytes())
            .map(|_| ())
            .map_err(|e| NamespaceError::unavailable(key, e))
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<Entry>, NamespaceError> {
        let mut out = Vec::new();
        for item in self.db.scan_prefix(prefix.as_bytes()) {
            let (key, value) = item.map_err(|e| NamespaceError::unavailable(prefix, e))?;
            out.push((String::from_utf8_lossy(&key).into_owned(), value.to_vec()));
        }
        Ok(out)
    }

    fn list_members(&self) -> Result<Vec<Member>, NamespaceError> {
        Ok(self.members.clone())
    }
}
