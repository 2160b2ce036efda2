//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::KvdirConfig;
use crate::error::NamespaceError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment.
    pub fn load() -> Result<KvdirConfig, NamespaceError> {
        let mut config = MergeService::load()?;
        config.ensure_default_cluster();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<KvdirConfig, NamespaceError> {
        let mut config = MergeService::load_from_file(path)?;
        config.ensure_default_cluster();
        config.validate()?;
        Ok(config)
    }

    /// Explicit file when given, standard sources otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<KvdirConfig, NamespaceError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }
}
