//! Repository tree reconstruction.
//!
//! Source-control listings arrive as a flat, unordered sequence of paths. The
//! forest is rebuilt in two passes over an arena: every accepted entry is
//! stored and indexed by path first, and only then linked to its parent. A
//! child listed before its parent is therefore never lost.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::TreeError;

/// Kind of a listing entry, as reported by the git trees API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Blob,
    Tree,
    /// Submodule gitlink; has no children of its own.
    Commit,
}

impl NodeKind {
    pub fn is_directory(self) -> bool {
        self == NodeKind::Tree
    }
}

/// One entry of a flat listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlatNode {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Passthrough fields (`mode`, `sha`, `size`, `url`, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FlatNode {
    pub fn new(path: impl Into<String>, kind: NodeKind) -> Self {
        FlatNode {
            path: path.into(),
            kind,
            extra: serde_json::Map::new(),
        }
    }

    pub fn blob(path: impl Into<String>) -> Self {
        Self::new(path, NodeKind::Blob)
    }

    pub fn tree(path: impl Into<String>) -> Self {
        Self::new(path, NodeKind::Tree)
    }
}

/// A node of the reconstructed hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }

    /// Depth-first lookup by path.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }
}

/// Something the builder recovered from while building the forest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TreeDiagnostic {
    /// Entry skipped because its path cannot be split.
    InvalidPath { path: String, reason: String },
    /// Entry whose parent is missing (or is not a directory); kept as a root.
    OrphanNode { path: String, parent: String },
    /// A later entry repeating an already accepted path; dropped.
    DuplicatePath { path: String },
}

/// Result of a build: the forest plus whatever was recovered from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TreeBuild {
    pub roots: Vec<TreeNode>,
    pub diagnostics: Vec<TreeDiagnostic>,
}

impl TreeBuild {
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(TreeNode::count).sum()
    }

    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        self.roots.iter().find_map(|r| r.find(path))
    }

    pub fn orphans(&self) -> impl Iterator<Item = &str> {
        self.diagnostics.iter().filter_map(|d| match d {
            TreeDiagnostic::OrphanNode { path, .. } => Some(path.as_str()),
            _ => None,
        })
    }
}

/// Split a listing path into `(parent, leaf)`. Top-level entries have an
/// empty parent.
pub fn split_path(path: &str) -> Result<(&str, &str), TreeError> {
    let invalid = |reason| TreeError::InvalidPath {
        path: path.to_string(),
        reason,
    };

    if path.is_empty() {
        return Err(invalid("path is empty"));
    }
    if path.starts_with('/') {
        return Err(invalid("path has a leading slash"));
    }
    if path.ends_with('/') {
        return Err(invalid("path has a trailing slash"));
    }
    if path.split('/').any(str::is_empty) {
        return Err(invalid("path has an empty segment"));
    }

    Ok(path.rsplit_once('/').unwrap_or(("", path)))
}

struct ArenaEntry<'n> {
    node: &'n FlatNode,
    parent: &'n str,
    name: &'n str,
    children: Vec<usize>,
}

/// Rebuild the forest from a flat listing in any order.
///
/// Roots and children keep the relative order of the input. Duplicate paths
/// keep the first entry and report the rest.
pub fn build_tree(nodes: &[FlatNode]) -> TreeBuild {
    let mut diagnostics = Vec::new();
    let mut arena: Vec<ArenaEntry> = Vec::with_capacity(nodes.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());

    // Pass 1: every accepted entry exists before any linking.
    for node in nodes {
        let (parent, name) = match split_path(&node.path) {
            Ok(split) => split,
            Err(TreeError::InvalidPath { path, reason }) => {
                warn!(%path, reason, "skipping listing entry");
                diagnostics.push(TreeDiagnostic::InvalidPath {
                    path,
                    reason: reason.to_string(),
                });
                continue;
            }
        };

        if index.contains_key(node.path.as_str()) {
            warn!(path = %node.path, "duplicate listing path, keeping first entry");
            diagnostics.push(TreeDiagnostic::DuplicatePath {
                path: node.path.clone(),
            });
            continue;
        }

        index.insert(node.path.as_str(), arena.len());
        arena.push(ArenaEntry {
            node,
            parent,
            name,
            children: Vec::new(),
        });
    }

    // Pass 2: link.
    let mut roots = Vec::new();
    for i in 0..arena.len() {
        let parent = arena[i].parent;
        if parent.is_empty() {
            roots.push(i);
            continue;
        }
        match index.get(parent) {
            Some(&p) if arena[p].node.kind.is_directory() => arena[p].children.push(i),
            _ => {
                let path = &arena[i].node.path;
                warn!(%path, parent, "orphan listing entry promoted to root");
                diagnostics.push(TreeDiagnostic::OrphanNode {
                    path: path.clone(),
                    parent: parent.to_string(),
                });
                roots.push(i);
            }
        }
    }

    let roots: Vec<TreeNode> = roots.into_iter().map(|i| materialize(&arena, i)).collect();
    debug!(
        entries = nodes.len(),
        roots = roots.len(),
        diagnostics = diagnostics.len(),
        "built repository tree"
    );

    TreeBuild { roots, diagnostics }
}

/// [`build_tree`] without the diagnostics.
pub fn build_forest(nodes: &[FlatNode]) -> Vec<TreeNode> {
    build_tree(nodes).roots
}

fn materialize(arena: &[ArenaEntry], i: usize) -> TreeNode {
    let entry = &arena[i];
    TreeNode {
        id: entry.node.path.clone(),
        name: entry.name.to_string(),
        path: entry.node.path.clone(),
        kind: entry.node.kind,
        children: entry
            .children
            .iter()
            .map(|&c| materialize(arena, c))
            .collect(),
    }
}

/// Presentation order: directories first, then case-insensitive name.
/// Applied recursively.
pub fn sort_for_display(nodes: &mut [TreeNode]) {
    nodes.sort_by(|a, b| {
        b.is_directory()
            .cmp(&a.is_directory())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });
    for node in nodes.iter_mut() {
        sort_for_display(&mut node.children);
    }
}
