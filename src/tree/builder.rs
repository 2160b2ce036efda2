//! Tree Builder
//!
//! Turns the prefix's own entry plus one scan of its children into either a
//! one-level listing or a fully nested node tree. Parent/child links come from path decomposition, never from scan
//! order: `/a-b` sorts between `/a` and `/a/b`, so order alone cannot group a
//! directory with its descendants.
//!
//! Directory inference:
//! - a stored entry decides its own kind (marker => directory, else leaf), and
//!   descendants of a leaf entry are unreachable;
//! - a path with descendants but no entry is synthesized as a directory,
//!   unless a directory marker exists beneath it. The materializer creates
//!   ancestors before anything below them, so such a marker means the path was
//!   deleted and its remaining descendants are orphans.

use crate::error::NamespaceError;
use crate::store::{Entry, NamespaceStore};
use crate::tree::node::Node;
use crate::tree::path::KeyPath;
use crate::types::{is_dir_marker, SEPARATOR};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Builds node listings and trees from a single store scan per call
pub struct TreeBuilder<'a> {
    store: &'a dyn NamespaceStore,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(store: &'a dyn NamespaceStore) -> Self {
        Self { store }
    }

    /// Immediate children of `prefix`; empty when `prefix` is a leaf or absent.
    pub fn list(&self, prefix: &KeyPath) -> Result<Vec<Node>, NamespaceError> {
        let entries = self.fetch(prefix)?;
        Ok(build_listing(prefix, &entries))
    }

    /// Full subtree rooted at `prefix`.
    pub fn recursive(&self, prefix: &KeyPath) -> Result<Node, NamespaceError> {
        let entries = self.fetch(prefix)?;
        Ok(build_tree(prefix, &entries))
    }

    /// The prefix's own entry (point lookup) followed by a scan of its
    /// `child_prefix`, so sibling keys such as `/a-b` are never fetched for `/a`.
    fn fetch(&self, prefix: &KeyPath) -> Result<Vec<Entry>, NamespaceError> {
        let mut entries = Vec::new();
        if !prefix.is_root() {
            match self.store.get(prefix.as_str()) {
                Ok(raw) => entries.push((prefix.to_string(), raw)),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }
        // The root's child prefix is "/" itself, so the scan includes its entry.
        entries.extend(self.store.scan_prefix(&prefix.child_prefix())?);
        Ok(entries)
    }
}

/// Scan result split into the prefix's own entry and its strict descendants.
struct ScanIndex<'e> {
    own: Option<&'e [u8]>,
    /// (full key, offset where the relative part starts, raw value)
    descendants: Vec<(&'e str, usize, &'e [u8])>,
    /// Full key -> is directory marker
    kinds: HashMap<&'e str, bool>,
    /// Missing-or-present paths that have a directory marker strictly below
    marked_ancestors: HashSet<&'e str>,
}

impl<'e> ScanIndex<'e> {
    fn new(prefix: &KeyPath, entries: &'e [Entry]) -> Self {
        let base = prefix.child_prefix().len();
        let mut index = ScanIndex {
            own: None,
            descendants: Vec::new(),
            kinds: HashMap::with_capacity(entries.len()),
            marked_ancestors: HashSet::new(),
        };

        for (key, value) in entries {
            if key.as_str() == prefix.as_str() {
                index.own = Some(value.as_slice());
                continue;
            }
            match prefix.relative_segments(key) {
                Some(segments) if segments.iter().all(|s| KeyPath::is_valid_segment(s)) => {}
                Some(_) => {
                    debug!(key = key.as_str(), "Skipping non-canonical store key");
                    continue;
                }
                None => continue,
            }
            let is_dir = is_dir_marker(value);
            index.kinds.insert(key.as_str(), is_dir);
            index.descendants.push((key.as_str(), base, value.as_slice()));
            if is_dir {
                for ancestor in intermediate_ancestors(key, base) {
                    index.marked_ancestors.insert(ancestor);
                }
            }
        }
        index
    }

    fn own_is_leaf(&self) -> bool {
        matches!(self.own, Some(raw) if !is_dir_marker(raw))
    }

    /// Whether every intermediate between the prefix and `key` is a directory
    /// entry or a synthesizable gap.
    fn reachable(&self, key: &str, base: usize) -> bool {
        for ancestor in intermediate_ancestors(key, base) {
            match self.kinds.get(ancestor) {
                Some(true) => {}
                Some(false) => {
                    debug!(key, shadowed_by = ancestor, "Skipping descendant of leaf");
                    return false;
                }
                None if self.marked_ancestors.contains(ancestor) => {
                    debug!(key, missing = ancestor, "Skipping orphaned entry");
                    return false;
                }
                None => {}
            }
        }
        true
    }
}

/// Ancestor keys of `key` strictly between the scan prefix and `key` itself.
fn intermediate_ancestors(key: &str, base: usize) -> impl Iterator<Item = &str> {
    key[base..]
        .match_indices(SEPARATOR)
        .map(move |(idx, _)| &key[..base + idx])
}

/// One-level listing of `prefix` from a scan of `prefix`.
pub fn build_listing(prefix: &KeyPath, entries: &[Entry]) -> Vec<Node> {
    let index = ScanIndex::new(prefix, entries);
    if index.own_is_leaf() {
        return Vec::new();
    }

    let child_prefix = prefix.child_prefix();
    let mut children: BTreeMap<&str, Option<&[u8]>> = BTreeMap::new();
    for &(key, base, value) in &index.descendants {
        let rel = &key[base..];
        match rel.find(SEPARATOR) {
            None => {
                children.insert(rel, Some(value));
            }
            Some(idx) => {
                let child_key = &key[..base + idx];
                if index.marked_ancestors.contains(child_key) && !index.kinds.contains_key(child_key)
                {
                    debug!(key = child_key, "Skipping orphaned child in listing");
                    continue;
                }
                children.entry(&rel[..idx]).or_insert(None);
            }
        }
    }

    children
        .into_iter()
        .map(|(name, raw)| {
            let path = KeyPath::from_canonical(format!("{}{}", child_prefix, name));
            match raw {
                Some(raw) => Node::from_entry(path, raw),
                None => Node::synthesized_directory(path),
            }
        })
        .collect()
}

#[derive(Default)]
struct Branch<'e> {
    entry: Option<&'e [u8]>,
    children: BTreeMap<&'e str, Branch<'e>>,
}

impl<'e> Branch<'e> {
    fn into_node(self, path: KeyPath) -> Node {
        let mut node = match self.entry {
            Some(raw) => Node::from_entry(path, raw),
            None => Node::synthesized_directory(path),
        };
        if !node.is_dir() {
            return node;
        }
        for (name, branch) in self.children {
            let child_path = node.path.child(name);
            node.push_child(branch.into_node(child_path));
        }
        node
    }
}

/// Nested tree rooted at `prefix` from a scan of `prefix`.
///
/// The prefix itself is always present in the result: a leaf when its entry
/// is a leaf, otherwise a (possibly synthesized, possibly empty) directory.
pub fn build_tree(prefix: &KeyPath, entries: &[Entry]) -> Node {
    let index = ScanIndex::new(prefix, entries);
    if let Some(raw) = index.own.filter(|raw| !is_dir_marker(raw)) {
        return Node::from_entry(prefix.clone(), raw);
    }

    let mut root = Branch {
        entry: index.own,
        children: BTreeMap::new(),
    };
    for &(key, base, value) in &index.descendants {
        if !index.reachable(key, base) {
            continue;
        }
        let mut cursor = &mut root;
        for segment in key[base..].split(SEPARATOR) {
            cursor = cursor.children.entry(segment).or_default();
        }
        cursor.entry = Some(value);
    }
    root.into_node(prefix.clone())
}
