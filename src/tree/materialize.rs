//! Path Materializer
//!
//! Creates the directory markers for every strict ancestor of a target path,
//! root first. Each step is independently idempotent, so two callers walking
//! overlapping chains converge on the same store state. The walk is not atomic;
//! a partial walk is repaired by running it again.

use crate::error::NamespaceError;
use crate::store::NamespaceStore;
use crate::tree::path::KeyPath;
use crate::types::{is_dir_marker, DEFAULT_DIR_VALUE};
use tracing::{debug, info};

/// Outcome of one materialization walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Ancestors created by this walk
    pub created: Vec<KeyPath>,
    /// Ancestors another writer created between our read and our create
    pub raced: Vec<KeyPath>,
}

impl MaterializeReport {
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.raced.is_empty()
    }
}

/// Ensures ancestor directories exist before a write
pub struct PathMaterializer<'a> {
    store: &'a dyn NamespaceStore,
}

impl<'a> PathMaterializer<'a> {
    pub fn new(store: &'a dyn NamespaceStore) -> Self {
        Self { store }
    }

    /// Materialize every strict ancestor of `target`; the target itself is
    /// never touched.
    ///
    /// An existing ancestor is left as is. If it is a leaf, the walk stops with
    /// `NotADirectory` naming it.
    pub fn ensure_ancestors(&self, target: &KeyPath) -> Result<MaterializeReport, NamespaceError> {
        let mut report = MaterializeReport::default();
        for ancestor in target.ancestors() {
            self.ensure_directory(&ancestor, &mut report)?;
        }
        Ok(report)
    }

    fn ensure_directory(
        &self,
        path: &KeyPath,
        report: &mut MaterializeReport,
    ) -> Result<(), NamespaceError> {
        match self.store.get(path.as_str()) {
            Ok(raw) if is_dir_marker(&raw) => return Ok(()),
            Ok(_) => {
                return Err(NamespaceError::NotADirectory {
                    path: path.to_string(),
                })
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        match self
            .store
            .put(path.as_str(), DEFAULT_DIR_VALUE.as_bytes(), true)
        {
            Ok(()) => {
                info!(path = %path, "Materialized directory");
                report.created.push(path.clone());
                Ok(())
            }
            Err(e) if e.is_already_exists() => {
                debug!(path = %path, "Directory created concurrently");
                report.raced.push(path.clone());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
