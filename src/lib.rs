//! kvdir: Directory Semantics over a Flat Key-Value Store
//!
//! Emulates a hierarchical namespace on top of a store that only knows flat,
//! ordered keys. Directories are keys holding a reserved sentinel value;
//! listings and recursive retrieval are rebuilt from one point lookup and one
//! prefix scan.

pub mod api;
pub mod audit;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod registry;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;

pub use api::{NamespaceApi, WriteMode};
pub use error::NamespaceError;
pub use registry::ConnectionRegistry;
pub use tree::{KeyPath, Node};
