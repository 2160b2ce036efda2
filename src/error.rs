//! Error types for namespace operations.

use thiserror::Error;

/// Errors surfaced by the namespace core, its store adapters and its
/// configuration layer.
///
/// Every path-related variant carries the canonical path at which the failure
/// happened, so a failure deep in an ancestor walk still names the segment
/// that triggered it.
#[derive(Debug, Error)]
pub enum NamespaceError {
    #[error("Key not found: {path}")]
    NotFound { path: String },

    #[error("Key already exists: {path}")]
    AlreadyExists { path: String },

    #[error("Invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Ancestor is a leaf, not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Directories cannot be modified: {path}")]
    DirectoryImmutable { path: String },

    #[error("Value at {path} is the reserved directory marker")]
    ReservedValue { path: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to encode {format}: {message}")]
    EncodingFailed { format: String, message: String },

    #[error("Store unavailable at {path}: {message}")]
    StoreUnavailable { path: String, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Cluster not found: {0}")]
    ClusterNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl NamespaceError {
    pub fn not_found(path: impl Into<String>) -> Self {
        NamespaceError::NotFound { path: path.into() }
    }

    pub fn already_exists(path: impl Into<String>) -> Self {
        NamespaceError::AlreadyExists { path: path.into() }
    }

    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        NamespaceError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn unavailable(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        NamespaceError::StoreUnavailable {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn encoding(format: impl Into<String>, err: impl std::fmt::Display) -> Self {
        NamespaceError::EncodingFailed {
            format: format.into(),
            message: err.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, NamespaceError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, NamespaceError::AlreadyExists { .. })
    }

    /// Path the error is attributed to, when it has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            NamespaceError::NotFound { path }
            | NamespaceError::AlreadyExists { path }
            | NamespaceError::InvalidPath { path, .. }
            | NamespaceError::NotADirectory { path }
            | NamespaceError::DirectoryImmutable { path }
            | NamespaceError::ReservedValue { path }
            | NamespaceError::StoreUnavailable { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for NamespaceError {
    fn from(err: config::ConfigError) -> Self {
        NamespaceError::ConfigError(err.to_string())
    }
}
