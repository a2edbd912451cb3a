use crate::discrete::distribution::{self, UNKNOWN_LOCATION};
use crate::tree::TreePayload;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Integer transition counts between most-probable states: rows are
/// source labels, columns destination labels. Recomputed fresh per
/// request, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationMatrix {
    pub sources: Vec<String>,
    pub targets: Vec<String>,
    pub counts: Vec<Vec<u32>>,
}

/// Reduce each node to its best state and count differing parent/child
/// state pairs across the tree edges. Self-transitions and `Unknown`
/// endpoints are skipped; a tree with no qualifying transition yields an
/// explicitly empty matrix.
pub fn build_migration_matrix(payload: &TreePayload) -> MigrationMatrix {
    let best_states: HashMap<&str, String> = payload
        .nodes
        .iter()
        .map(|node| {
            let normalized =
                distribution::normalize(distribution::extract_distribution(&node.annotations));
            (node.id.as_str(), distribution::best_state(&normalized).0)
        })
        .collect();

    let mut transitions: BTreeMap<(String, String), u32> = BTreeMap::new();
    for edge in &payload.edges {
        let (Some(src), Some(dst)) = (
            best_states.get(edge.parent_id.as_str()),
            best_states.get(edge.child_id.as_str()),
        ) else {
            continue;
        };
        if src == dst || src == UNKNOWN_LOCATION || dst == UNKNOWN_LOCATION {
            continue;
        }
        *transitions.entry((src.clone(), dst.clone())).or_insert(0) += 1;
    }

    if transitions.is_empty() {
        return MigrationMatrix::default();
    }

    let sources: Vec<String> = transitions
        .keys()
        .map(|(src, _)| src.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let targets: Vec<String> = transitions
        .keys()
        .map(|(_, dst)| dst.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let counts = sources
        .iter()
        .map(|src| {
            targets
                .iter()
                .map(|dst| {
                    transitions
                        .get(&(src.clone(), dst.clone()))
                        .copied()
                        .unwrap_or(0)
                })
                .collect()
        })
        .collect();

    MigrationMatrix {
        sources,
        targets,
        counts,
    }
}
