//! MergeService: orchestrates sources, applies merge policy, deserializes to KvdirConfig.

use crate::config::sources::{environment, file};
use crate::config::KvdirConfig;
use config::ConfigError;
use std::path::Path;

use super::builder_with_defaults;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from standard sources.
    /// Precedence: defaults (lowest) -> global file -> environment (highest).
    pub fn load() -> Result<KvdirConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = file::add_global(builder)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    /// The global file is skipped when an explicit file is given.
    pub fn load_from_file(path: &Path) -> Result<KvdirConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = file::add_explicit(builder, path)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
