//! Core constants shared by the namespace layer.

/// Reserved value stored at a key to mark it as a directory.
///
/// A leaf can never legitimately hold this value; writes of it as leaf data
/// are rejected at the API boundary.
pub const DEFAULT_DIR_VALUE: &str = "kvdir_dir_$2H#%gRe3*t";

/// Canonical path of the namespace root.
pub const ROOT_PATH: &str = "/";

/// Path separator between namespace segments.
pub const SEPARATOR: char = '/';

/// True when raw store bytes are the directory marker.
pub fn is_dir_marker(value: &[u8]) -> bool {
    value == DEFAULT_DIR_VALUE.as_bytes()
}
