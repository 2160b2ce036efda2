//! Namespace Store
//!
//! Minimal capability over the underlying flat key-value store. Keys are
//! canonical namespace paths, values are raw bytes, and the prefix scan is the
//! only primitive that exposes hierarchy.

pub mod memory;
pub mod persistence;

use crate::error::NamespaceError;
use serde::{Deserialize, Serialize};

pub use memory::MemoryStore;
pub use persistence::SledStore;

/// One `(key, value)` pair returned by a prefix scan
pub type Entry = (String, Vec<u8>);

/// Cluster member descriptor, passed through untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub peer_urls: Vec<String>,
    #[serde(default)]
    pub client_urls: Vec<String>,
    #[serde(default)]
    pub is_leader: bool,
}

/// Store interface consumed by the namespace core
///
/// Implementations must make `put` with `must_not_exist` atomic; the
/// materializer relies on it for concurrent ancestor creation.
pub trait NamespaceStore: Send + Sync {
    /// Point lookup; `NotFound` when absent.
    fn get(&self, key: &str) -> Result<Vec<u8>, NamespaceError>;

    /// Create or overwrite; `AlreadyExists` when `must_not_exist` and present.
    fn put(&self, key: &str, value: &[u8], must_not_exist: bool) -> Result<(), NamespaceError>;

    /// Remove exactly one entry. Absent keys are not an error.
    fn delete(&self, key: &str) -> Result<(), NamespaceError>;

    /// Every entry whose key starts with `prefix`, in lexicographic key order.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<Entry>, NamespaceError>;

    fn list_members(&self) -> Result<Vec<Member>, NamespaceError>;
}
