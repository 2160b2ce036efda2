//! Namespace API
//!
//! The operations the surrounding system composes: list, read, write, delete,
//! recursive retrieval, tree formatting and member listing. The API holds no
//! mutable state; all coordination is delegated to the store's atomic `put`
//! and single-key `delete`.

use crate::error::NamespaceError;
use crate::format::FormatRegistry;
use crate::store::{Member, NamespaceStore};
use crate::tree::builder::TreeBuilder;
use crate::tree::materialize::{MaterializeReport, PathMaterializer};
use crate::tree::node::Node;
use crate::tree::path::KeyPath;
use crate::types::{is_dir_marker, DEFAULT_DIR_VALUE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Create-or-update semantics for a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Fail with `AlreadyExists` if the path is present
    Create,
    Overwrite,
}

impl WriteMode {
    fn must_not_exist(self) -> bool {
        matches!(self, WriteMode::Create)
    }
}

/// Namespace operations over one store connection
#[derive(Clone)]
pub struct NamespaceApi {
    store: Arc<dyn NamespaceStore>,
    formats: Arc<FormatRegistry>,
}

impl NamespaceApi {
    pub fn new(store: Arc<dyn NamespaceStore>) -> Self {
        Self::with_formats(store, Arc::new(FormatRegistry::with_defaults()))
    }

    pub fn with_formats(store: Arc<dyn NamespaceStore>, formats: Arc<FormatRegistry>) -> Self {
        Self { store, formats }
    }

    pub fn store(&self) -> &dyn NamespaceStore {
        self.store.as_ref()
    }

    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    /// One-level listing of `path`.
    pub fn list(&self, path: &str) -> Result<Vec<Node>, NamespaceError> {
        let prefix = KeyPath::parse(path)?;
        debug!(path = %prefix, "list");
        TreeBuilder::new(self.store()).list(&prefix)
    }

    /// Point read of a single entry, without children.
    pub fn read(&self, path: &str) -> Result<Node, NamespaceError> {
        let key = KeyPath::parse(path)?;
        debug!(path = %key, "read");
        let raw = self.store.get(key.as_str())?;
        Ok(Node::from_entry(key, &raw))
    }

    /// Write a leaf value, materializing its ancestors first.
    ///
    /// An existing directory is never replaced: `Overwrite` on one fails with
    /// `DirectoryImmutable`, `Create` with `AlreadyExists`.
    pub fn write(
        &self,
        path: &str,
        value: &str,
        mode: WriteMode,
    ) -> Result<MaterializeReport, NamespaceError> {
        let key = KeyPath::parse(path)?;
        if key.is_root() {
            return Err(NamespaceError::invalid_path(
                key.as_str(),
                "the root is always a directory",
            ));
        }
        if is_dir_marker(value.as_bytes()) {
            return Err(NamespaceError::ReservedValue {
                path: key.to_string(),
            });
        }
        debug!(path = %key, ?mode, "write");
        if mode == WriteMode::Overwrite {
            match self.store.get(key.as_str()) {
                Ok(raw) if is_dir_marker(&raw) => {
                    return Err(NamespaceError::DirectoryImmutable {
                        path: key.to_string(),
                    })
                }
                Ok(_) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }
        let report = PathMaterializer::new(self.store()).ensure_ancestors(&key)?;
        self.store
            .put(key.as_str(), value.as_bytes(), mode.must_not_exist())?;
        Ok(report)
    }

    /// Create a directory. Directories can be created or deleted, never updated.
    pub fn create_dir(&self, path: &str) -> Result<MaterializeReport, NamespaceError> {
        self.write_dir(path, WriteMode::Create)
    }

    pub fn write_dir(&self, path: &str, mode: WriteMode) -> Result<MaterializeReport, NamespaceError> {
        let key = KeyPath::parse(path)?;
        if mode == WriteMode::Overwrite {
            return Err(NamespaceError::DirectoryImmutable {
                path: key.to_string(),
            });
        }
        debug!(path = %key, "create directory");
        let report = PathMaterializer::new(self.store()).ensure_ancestors(&key)?;
        self.store
            .put(key.as_str(), DEFAULT_DIR_VALUE.as_bytes(), true)?;
        Ok(report)
    }

    /// Delete an entry; returns the number of keys deleted, counting `path`
    /// itself whether or not it was present.
    ///
    /// Without `recursive` exactly one key is removed and descendants of a
    /// directory stay in the store as orphans.
    pub fn delete(&self, path: &str, recursive: bool) -> Result<usize, NamespaceError> {
        let key = KeyPath::parse(path)?;
        debug!(path = %key, recursive, "delete");
        let mut removed = 0;
        if recursive {
            for (descendant, _) in self.store.scan_prefix(&key.child_prefix())? {
                if descendant == key.as_str() {
                    continue;
                }
                self.store.delete(&descendant)?;
                removed += 1;
            }
        }
        self.store.delete(key.as_str())?;
        Ok(removed + 1)
    }

    /// Full subtree rooted at `path`, tolerating unmaterialized intermediates.
    pub fn get_recursive_value(&self, path: &str) -> Result<Node, NamespaceError> {
        let prefix = KeyPath::parse(path)?;
        debug!(path = %prefix, "recursive value");
        TreeBuilder::new(self.store()).recursive(&prefix)
    }

    pub fn format_tree(&self, root: &Node, format: &str) -> Result<String, NamespaceError> {
        self.formats.format_tree(root, format)
    }

    /// Recursive retrieval followed by formatting.
    pub fn format_path(&self, path: &str, format: &str) -> Result<String, NamespaceError> {
        // Resolve the encoder before touching the store.
        self.formats.get(format)?;
        let root = self.get_recursive_value(path)?;
        self.format_tree(&root, format)
    }

    pub fn list_members(&self) -> Result<Vec<Member>, NamespaceError> {
        self.store.list_members()
    }
}
