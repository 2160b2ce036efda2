//! Connection registry
//!
//! Maps cluster names to store connections and gates them by caller role.
//! The registry is built from configuration and passed by reference to
//! whoever needs a connection; there is no process-wide lookup state.

use crate::api::NamespaceApi;
use crate::config::{paths, ClusterConfig, KvdirConfig, StoreBackend};
use crate::error::NamespaceError;
use crate::format::FormatRegistry;
use crate::store::{MemoryStore, NamespaceStore, SledStore};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Public view of a cluster, safe to hand to any caller allowed to see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterDescriptor {
    pub name: String,
    pub title: Option<String>,
    pub roles: Vec<String>,
}

/// Configured user and its role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDescriptor {
    pub name: String,
    pub role: String,
}

struct ClusterEntry {
    config: ClusterConfig,
    /// Opened on first use; sled allows one handle per path and process.
    store: Mutex<Option<Arc<dyn NamespaceStore>>>,
}

impl ClusterEntry {
    fn store(&self) -> Result<Arc<dyn NamespaceStore>, NamespaceError> {
        let mut slot = self.store.lock();
        if let Some(store) = slot.as_ref() {
            return Ok(Arc::clone(store));
        }
        let store = open_store(&self.config)?;
        *slot = Some(Arc::clone(&store));
        Ok(store)
    }
}

fn open_store(config: &ClusterConfig) -> Result<Arc<dyn NamespaceStore>, NamespaceError> {
    match &config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::with_members(config.members.clone()))),
        StoreBackend::Sled { path } => {
            let path = match path {
                Some(path) => path.clone(),
                None => paths::cluster_store_dir(&config.name)?,
            };
            info!(cluster = %config.name, path = %path.display(), "Opening sled store");
            Ok(Arc::new(SledStore::open(&path, config.members.clone())?))
        }
    }
}

/// Named store connections with role-based access
pub struct ConnectionRegistry {
    clusters: BTreeMap<String, ClusterEntry>,
    users: BTreeMap<String, String>,
    default_cluster: String,
    formats: Arc<FormatRegistry>,
}

impl ConnectionRegistry {
    pub fn new(default_cluster: impl Into<String>) -> Self {
        Self {
            clusters: BTreeMap::new(),
            users: BTreeMap::new(),
            default_cluster: default_cluster.into(),
            formats: Arc::new(FormatRegistry::with_defaults()),
        }
    }

    pub fn from_config(config: &KvdirConfig) -> Result<Self, NamespaceError> {
        config.validate()?;
        let mut registry = Self::new(config.default_cluster.clone());
        for cluster in &config.clusters {
            registry.add_cluster(cluster.clone());
        }
        for user in &config.users {
            registry.users.insert(user.username.clone(), user.role.clone());
        }
        Ok(registry)
    }

    /// Add a cluster whose store is opened lazily from its backend config.
    pub fn add_cluster(&mut self, config: ClusterConfig) {
        self.clusters.insert(
            config.name.clone(),
            ClusterEntry {
                config,
                store: Mutex::new(None),
            },
        );
    }

    /// Add a cluster backed by an already open store.
    pub fn add_cluster_with_store(&mut self, config: ClusterConfig, store: Arc<dyn NamespaceStore>) {
        self.clusters.insert(
            config.name.clone(),
            ClusterEntry {
                config,
                store: Mutex::new(Some(store)),
            },
        );
    }

    pub fn add_user(&mut self, name: impl Into<String>, role: impl Into<String>) {
        self.users.insert(name.into(), role.into());
    }

    pub fn set_formats(&mut self, formats: FormatRegistry) {
        self.formats = Arc::new(formats);
    }

    pub fn default_cluster(&self) -> &str {
        &self.default_cluster
    }

    /// Role of a configured user; unknown users get the empty role.
    pub fn role_of(&self, user: &str) -> &str {
        self.users.get(user).map(String::as_str).unwrap_or("")
    }

    pub fn users(&self) -> Vec<UserDescriptor> {
        self.users
            .iter()
            .map(|(name, role)| UserDescriptor {
                name: name.clone(),
                role: role.clone(),
            })
            .collect()
    }

    /// Clusters the role may use, in name order.
    pub fn visible_clusters(&self, role: &str) -> Vec<ClusterDescriptor> {
        self.clusters
            .values()
            .filter(|entry| entry.config.allows(role))
            .map(|entry| ClusterDescriptor {
                name: entry.config.name.clone(),
                title: entry.config.title.clone(),
                roles: entry.config.roles.clone(),
            })
            .collect()
    }

    /// Namespace API over `cluster` (or the default cluster) for `role`.
    pub fn open(&self, cluster: Option<&str>, role: &str) -> Result<NamespaceApi, NamespaceError> {
        let name = cluster.unwrap_or(&self.default_cluster);
        let entry = self
            .clusters
            .get(name)
            .ok_or_else(|| NamespaceError::ClusterNotFound(name.to_string()))?;
        if !entry.config.allows(role) {
            return Err(NamespaceError::Unauthorized(format!(
                "role {:?} may not access cluster {}",
                role, name
            )));
        }
        Ok(NamespaceApi::with_formats(
            entry.store()?,
            Arc::clone(&self.formats),
        ))
    }
}
