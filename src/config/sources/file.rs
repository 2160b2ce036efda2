//! File sources: the optional global config and an explicit config file.

use crate::config::paths;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::Path;

/// Add `$XDG_CONFIG_HOME/kvdir/config.toml` when it exists.
pub fn add_global(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match paths::global_config_path() {
        Ok(path) if path.exists() => Ok(builder.add_source(
            File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(false),
        )),
        _ => Ok(builder),
    }
}

/// Add an explicit file; it must exist. The format follows the extension.
pub fn add_explicit(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    Ok(builder.add_source(File::from(path).required(true)))
}
