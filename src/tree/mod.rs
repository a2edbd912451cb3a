pub mod annotation;
mod newick;
mod nexus;
pub mod types;

pub use self::types::{TreeEdge, TreeMetadata, TreeNode, TreePayload};

use self::newick::Clade;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::path::Path;

/// Serialization formats accepted for MCC trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Nexus,
    Newick,
}

/// Determine the tree format, trusting an explicit file extension before
/// falling back to content sniffing.
pub fn detect_format(name: Option<&str>, bytes: &[u8]) -> Result<TreeFormat> {
    if let Some(name) = name {
        let extension = Path::new(name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());
        match extension.as_deref() {
            Some("nexus") | Some("nex") => return Ok(TreeFormat::Nexus),
            Some("nwk") | Some("newick") => return Ok(TreeFormat::Newick),
            Some("tree") | Some("tre") | Some("trees") => {
                return if preview(bytes).starts_with("#NEXUS") {
                    Ok(TreeFormat::Nexus)
                } else {
                    Ok(TreeFormat::Newick)
                };
            }
            _ => {}
        }
    }

    let head = preview(bytes);
    if head.starts_with("#NEXUS") {
        Ok(TreeFormat::Nexus)
    } else if head.starts_with('(') {
        Ok(TreeFormat::Newick)
    } else {
        Err(Error::Parse(format!(
            "unsupported MCC tree format for {}",
            name.unwrap_or("input")
        )))
    }
}

/// First ~20 significant characters, uppercased, from the head of the file.
fn preview(bytes: &[u8]) -> String {
    let snippet = &bytes[..bytes.len().min(2048)];
    String::from_utf8_lossy(snippet)
        .trim_start()
        .to_uppercase()
        .chars()
        .take(20)
        .collect()
}

/// Parse raw tree bytes into a node/edge payload.
///
/// `name` is the stored filename when one is known; it supplies the
/// extension hint for format detection and shows up in error messages.
pub fn parse_tree(bytes: &[u8], name: Option<&str>) -> Result<TreePayload> {
    let format = detect_format(name, bytes)?;
    let text = String::from_utf8_lossy(bytes);

    let (tree_name, root) = match format {
        TreeFormat::Nexus => {
            let prepared = nexus::prepare(&text)?;
            (prepared.name, newick::parse(&prepared.newick)?)
        }
        TreeFormat::Newick => (None, newick::parse(&text)?),
    };

    build_payload(tree_name, &root)
}

fn build_payload(name: Option<String>, root: &Clade) -> Result<TreePayload> {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut counter = 0usize;
    walk(root, None, 0.0, &mut counter, &mut nodes, &mut edges);

    if nodes.is_empty() {
        return Err(Error::Parse(
            "tree contains no clades; check the tree statement".to_string(),
        ));
    }

    let max_depth = nodes
        .iter()
        .map(|node| node.time_from_root)
        .fold(0.0_f64, f64::max);
    for node in &mut nodes {
        node.time_before_present = max_depth - node.time_from_root;
    }

    let parents: HashSet<&str> = edges.iter().map(|edge| edge.parent_id.as_str()).collect();
    let tip_count = nodes
        .iter()
        .filter(|node| !parents.contains(node.id.as_str()))
        .count();

    Ok(TreePayload {
        nodes,
        edges,
        metadata: TreeMetadata {
            name,
            root_height: max_depth,
            tip_count,
        },
    })
}

/// Depth-first walk assigning `n1..nN` identifiers in visitation order and
/// accumulating branch lengths into `time_from_root`. Missing branch
/// lengths count as zero.
fn walk(
    clade: &Clade,
    parent_id: Option<&str>,
    parent_depth: f64,
    counter: &mut usize,
    nodes: &mut Vec<TreeNode>,
    edges: &mut Vec<TreeEdge>,
) {
    *counter += 1;
    let id = format!("n{}", counter);
    let time_from_root = parent_depth + clade.branch_length.unwrap_or(0.0);

    let mut annotations = BTreeMap::new();
    for comment in &clade.comments {
        for (key, value) in annotation::parse_comment(comment) {
            annotations.insert(key, value);
        }
    }

    nodes.push(TreeNode {
        id: id.clone(),
        label: clade.name.clone(),
        parent_id: parent_id.map(str::to_string),
        branch_length: clade.branch_length,
        time_from_root,
        time_before_present: 0.0,
        annotations,
    });

    if let Some(parent_id) = parent_id {
        edges.push(TreeEdge {
            parent_id: parent_id.to_string(),
            child_id: id.clone(),
        });
    }

    for child in &clade.children {
        walk(child, Some(&id), time_from_root, counter, nodes, edges);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format_from_extension() {
        assert_eq!(
            detect_format(Some("sample.nex"), b"whatever").unwrap(),
            TreeFormat::Nexus
        );
        assert_eq!(
            detect_format(Some("sample.nwk"), b"whatever").unwrap(),
            TreeFormat::Newick
        );
    }

    #[test]
    fn test_detect_format_sniffs_ambiguous_extension() {
        assert_eq!(
            detect_format(Some("sample.tree"), b"  #nexus\nBegin trees;").unwrap(),
            TreeFormat::Nexus
        );
        assert_eq!(
            detect_format(Some("sample.tree"), b"(A:1,B:2);").unwrap(),
            TreeFormat::Newick
        );
    }

    #[test]
    fn test_detect_format_rejects_unknown_content() {
        let err = detect_format(Some("notes.txt"), b"hello world").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_parse_tree_depths_and_edges() {
        let payload = parse_tree(b"((A:0.1,B:0.3):0.2,C:0.4);", None).unwrap();
        assert_eq!(payload.nodes.len(), 5);
        assert_eq!(payload.edges.len(), 4);

        let root = &payload.nodes[0];
        assert!(root.parent_id.is_none());
        assert_eq!(root.time_from_root, 0.0);
        // Deepest tip is B at 0.2 + 0.3.
        assert!((payload.metadata.root_height - 0.5).abs() < 1e-12);
        let b = payload
            .nodes
            .iter()
            .find(|node| node.label.as_deref() == Some("B"))
            .unwrap();
        assert!((b.time_before_present - 0.0).abs() < 1e-12);
        assert_eq!(payload.metadata.tip_count, 3);
    }

    #[test]
    fn test_parse_tree_node_ids_follow_walk_order() {
        let payload = parse_tree(b"((A:0.1,B:0.3):0.2,C:0.4);", None).unwrap();
        let ids: Vec<&str> = payload.nodes.iter().map(|node| node.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "n2", "n3", "n4", "n5"]);
        assert_eq!(payload.edges[0].parent_id, "n1");
        assert_eq!(payload.edges[0].child_id, "n2");
    }
}
