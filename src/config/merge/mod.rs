pub mod service;

use crate::config::KvdirConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with the serialized defaults so every later source only
/// overrides what it names.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = Config::try_from(&KvdirConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}
