//! XDG Base Directory utilities for kvdir data and configuration.

use crate::error::NamespaceError;
use std::path::PathBuf;

/// Get XDG data home directory
///
/// Returns `$XDG_DATA_HOME` if set, otherwise defaults to `$HOME/.local/share`
pub fn data_home() -> Option<PathBuf> {
    if let Ok(xdg_data_home) = std::env::var("XDG_DATA_HOME") {
        return Some(PathBuf::from(xdg_data_home));
    }

    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".local").join("share"))
}

/// Get XDG config home directory
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise defaults to `$HOME/.config`
pub fn config_home() -> Result<PathBuf, NamespaceError> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config_home));
    }

    let home = std::env::var("HOME").map_err(|_| {
        NamespaceError::ConfigError(
            "Could not determine XDG config home directory (HOME not set)".to_string(),
        )
    })?;

    Ok(PathBuf::from(home).join(".config"))
}

/// Global configuration file: `$XDG_CONFIG_HOME/kvdir/config.toml`
pub fn global_config_path() -> Result<PathBuf, NamespaceError> {
    Ok(config_home()?.join("kvdir").join("config.toml"))
}

/// Default sled directory for a cluster: `$XDG_DATA_HOME/kvdir/clusters/<name>/`
pub fn cluster_store_dir(cluster: &str) -> Result<PathBuf, NamespaceError> {
    let data_home = data_home().ok_or_else(|| {
        NamespaceError::ConfigError(
            "Could not determine XDG data home directory (HOME not set)".to_string(),
        )
    })?;
    Ok(data_home.join("kvdir").join("clusters").join(cluster))
}
