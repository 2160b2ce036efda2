//! Configuration
//!
//! Clusters, users, logging and audit settings, layered by the `config` crate:
//! serialized defaults, then the global file (or an explicit file), then
//! `KVDIR__*` environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::NamespaceError;
use crate::logging::LoggingConfig;
use crate::store::Member;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

fn default_cluster_name() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

fn default_audit_capacity() -> usize {
    1024
}

/// Store backend for a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local store, lost on exit
    Memory,
    /// Persistent sled database; `path` defaults to the XDG data dir
    Sled {
        #[serde(default)]
        path: Option<PathBuf>,
    },
}

impl Default for StoreBackend {
    fn default() -> Self {
        StoreBackend::Sled { path: None }
    }
}

/// One named store connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub name: String,

    /// Display title
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub backend: StoreBackend,

    /// Roles allowed to use the cluster; empty means every role
    #[serde(default)]
    pub roles: Vec<String>,

    /// Member descriptors reported by `members`
    #[serde(default)]
    pub members: Vec<Member>,
}

impl ClusterConfig {
    pub fn new(name: impl Into<String>, backend: StoreBackend) -> Self {
        Self {
            name: name.into(),
            title: None,
            backend,
            roles: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn allows(&self, role: &str) -> bool {
        self.roles.is_empty() || self.roles.iter().any(|r| r == role)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub username: String,
    #[serde(default)]
    pub role: String,
}

/// Audit sink settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Pending events kept before new ones are dropped
    #[serde(default = "default_audit_capacity")]
    pub capacity: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            capacity: default_audit_capacity(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvdirConfig {
    #[serde(default = "default_cluster_name")]
    pub default_cluster: String,

    #[serde(default)]
    pub clusters: Vec<ClusterConfig>,

    #[serde(default)]
    pub users: Vec<UserConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub audit: AuditConfig,
}

impl Default for KvdirConfig {
    fn default() -> Self {
        Self {
            default_cluster: default_cluster_name(),
            clusters: Vec::new(),
            users: Vec::new(),
            logging: LoggingConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl KvdirConfig {
    /// With no clusters configured, serve the default cluster from the
    /// default sled location.
    pub fn ensure_default_cluster(&mut self) {
        if self.clusters.is_empty() {
            self.clusters.push(ClusterConfig::new(
                self.default_cluster.clone(),
                StoreBackend::default(),
            ));
        }
    }

    pub fn validate(&self) -> Result<(), NamespaceError> {
        let mut seen = HashSet::new();
        for cluster in &self.clusters {
            if cluster.name.trim().is_empty() {
                return Err(NamespaceError::ConfigError(
                    "Cluster name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(cluster.name.as_str()) {
                return Err(NamespaceError::ConfigError(format!(
                    "Duplicate cluster name: {}",
                    cluster.name
                )));
            }
            if let StoreBackend::Sled { path: Some(path) } = &cluster.backend {
                if path.as_os_str().is_empty() {
                    return Err(NamespaceError::ConfigError(format!(
                        "Cluster {} has an empty sled path",
                        cluster.name
                    )));
                }
            }
        }
        if self.audit.capacity == 0 {
            return Err(NamespaceError::ConfigError(
                "Audit capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cluster(&self, name: &str) -> Option<&ClusterConfig> {
        self.clusters.iter().find(|c| c.name == name)
    }

    pub fn user(&self, username: &str) -> Option<&UserConfig> {
        self.users.iter().find(|u| u.username == username)
    }
}
