//! Directory tree over a flat key space
//!
//! Paths, nodes, single-scan tree construction and ancestor materialization.

pub mod builder;
pub mod materialize;
pub mod node;
pub mod path;

pub use builder::{build_listing, build_tree, TreeBuilder};
pub use materialize::{MaterializeReport, PathMaterializer};
pub use node::{Node, NodeKind};
pub use path::KeyPath;
