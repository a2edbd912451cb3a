use crate::tree::annotation::AnnotationValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single clade from a parsed MCC tree.
///
/// Nodes are immutable once the walk has produced them. Identifiers are
/// assigned in visitation order (`n1`, `n2`, ...) and carry no meaning
/// beyond uniqueness within the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    /// Original tip or internal node label, when the tree carried one.
    pub label: Option<String>,
    /// Identifier of the parent node; the root has none.
    pub parent_id: Option<String>,
    /// Branch length leading to this node in the tree's time units.
    pub branch_length: Option<f64>,
    /// Cumulative distance from the root (older values are larger).
    pub time_from_root: f64,
    /// Distance from the present, i.e. max depth minus `time_from_root`.
    pub time_before_present: f64,
    /// Free-form annotation map parsed from the node's `[&...]` comment.
    #[serde(default)]
    pub annotations: BTreeMap<String, AnnotationValue>,
}

/// Directed parent/child relation between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEdge {
    pub parent_id: String,
    pub child_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeMetadata {
    /// Tree statement name from a NEXUS file, when present.
    pub name: Option<String>,
    /// Maximum depth across the whole tree.
    pub root_height: f64,
    pub tip_count: usize,
}

/// Parsed tree: node list, edge list and summary metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreePayload {
    pub nodes: Vec<TreeNode>,
    pub edges: Vec<TreeEdge>,
    pub metadata: TreeMetadata,
}
