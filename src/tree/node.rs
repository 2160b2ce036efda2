//! Namespace node types

use crate::tree::path::KeyPath;
use crate::types::{is_dir_marker, DEFAULT_DIR_VALUE};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Directory or leaf payload of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Children are ordered by full path and only populated by listings and
    /// recursive retrieval.
    Directory { children: Vec<Node> },
    Leaf { value: String },
}

/// One namespace entry, built transiently from store responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub path: KeyPath,
    pub kind: NodeKind,
    /// False when the directory was inferred from descendants and has no
    /// marker entry of its own in the store.
    pub materialized: bool,
}

impl Node {
    pub fn directory(path: KeyPath) -> Self {
        Node {
            path,
            kind: NodeKind::Directory {
                children: Vec::new(),
            },
            materialized: true,
        }
    }

    pub fn synthesized_directory(path: KeyPath) -> Self {
        Node {
            materialized: false,
            ..Node::directory(path)
        }
    }

    pub fn leaf(path: KeyPath, value: impl Into<String>) -> Self {
        Node {
            path,
            kind: NodeKind::Leaf {
                value: value.into(),
            },
            materialized: true,
        }
    }

    /// Classify a raw store entry by the directory marker.
    pub fn from_entry(path: KeyPath, raw: &[u8]) -> Self {
        if is_dir_marker(raw) {
            Node::directory(path)
        } else {
            Node::leaf(path, String::from_utf8_lossy(raw).into_owned())
        }
    }

    pub fn full_path(&self) -> &str {
        self.path.as_str()
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// Stored value; the directory marker for directories.
    pub fn value(&self) -> &str {
        match &self.kind {
            NodeKind::Directory { .. } => DEFAULT_DIR_VALUE,
            NodeKind::Leaf { value } => value,
        }
    }

    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Directory { children } => children,
            NodeKind::Leaf { .. } => &[],
        }
    }

    pub(crate) fn push_child(&mut self, child: Node) {
        if let NodeKind::Directory { children } = &mut self.kind {
            children.push(child);
        }
    }

    /// Total number of nodes in this subtree, self included.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(Node::count).sum::<usize>()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Node", 5)?;
        state.serialize_field("full_path", self.full_path())?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("is_dir", &self.is_dir())?;
        match &self.kind {
            NodeKind::Leaf { value } => state.serialize_field("value", value)?,
            NodeKind::Directory { .. } => state.skip_field("value")?,
        }
        if self.children().is_empty() {
            state.skip_field("children")?;
        } else {
            state.serialize_field("children", self.children())?;
        }
        state.end()
    }
}
