//! Tree Formatter
//!
//! Serializes a recursive node tree into a nested document: every directory
//! becomes an ordered map keyed by child segment, every leaf a string scalar.
//! Encoders are looked up by name in a [`FormatRegistry`].

use crate::error::NamespaceError;
use crate::tree::node::{Node, NodeKind};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Serializes the nested document produced by [`tree_document`]
pub trait TreeEncoder: Send + Sync {
    fn name(&self) -> &'static str;
    fn encode(&self, document: &Value) -> Result<String, NamespaceError>;
}

/// Nested document for a tree.
///
/// A leaf root becomes `{name: value}`; an empty directory becomes `{}`.
pub fn tree_document(root: &Node) -> Value {
    match &root.kind {
        NodeKind::Leaf { value } => {
            let mut map = Map::new();
            map.insert(root.name().to_string(), Value::String(value.clone()));
            Value::Object(map)
        }
        NodeKind::Directory { .. } => directory_document(root),
    }
}

fn directory_document(node: &Node) -> Value {
    let mut map = Map::new();
    for child in node.children() {
        let value = match &child.kind {
            NodeKind::Leaf { value } => Value::String(value.clone()),
            NodeKind::Directory { .. } => directory_document(child),
        };
        map.insert(child.name().to_string(), value);
    }
    Value::Object(map)
}

/// JSON with four-space indentation
pub struct JsonEncoder;

impl TreeEncoder for JsonEncoder {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, document: &Value) -> Result<String, NamespaceError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        document
            .serialize(&mut serializer)
            .map_err(|e| NamespaceError::encoding("json", e))?;
        String::from_utf8(buf).map_err(|e| NamespaceError::encoding("json", e))
    }
}

pub struct TomlEncoder;

impl TreeEncoder for TomlEncoder {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn encode(&self, document: &Value) -> Result<String, NamespaceError> {
        toml::to_string_pretty(document).map_err(|e| NamespaceError::encoding("toml", e))
    }
}

pub struct YamlEncoder;

impl TreeEncoder for YamlEncoder {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn encode(&self, document: &Value) -> Result<String, NamespaceError> {
        serde_yaml::to_string(document).map_err(|e| NamespaceError::encoding("yaml", e))
    }
}

/// Encoders by lowercase name
pub struct FormatRegistry {
    encoders: BTreeMap<String, Box<dyn TreeEncoder>>,
}

impl FormatRegistry {
    pub fn empty() -> Self {
        Self {
            encoders: BTreeMap::new(),
        }
    }

    /// Registry with the built-in json, toml and yaml encoders.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(JsonEncoder));
        registry.register(Box::new(TomlEncoder));
        registry.register(Box::new(YamlEncoder));
        registry
    }

    /// Add or replace an encoder under its own name.
    pub fn register(&mut self, encoder: Box<dyn TreeEncoder>) {
        self.encoders
            .insert(encoder.name().to_ascii_lowercase(), encoder);
    }

    pub fn names(&self) -> Vec<&str> {
        self.encoders.keys().map(String::as_str).collect()
    }

    pub fn get(&self, format: &str) -> Result<&dyn TreeEncoder, NamespaceError> {
        self.encoders
            .get(&format.trim().to_ascii_lowercase())
            .map(|e| e.as_ref())
            .ok_or_else(|| NamespaceError::UnsupportedFormat(format.to_string()))
    }

    pub fn format_tree(&self, root: &Node, format: &str) -> Result<String, NamespaceError> {
        let encoder = self.get(format)?;
        encoder.encode(&tree_document(root))
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
