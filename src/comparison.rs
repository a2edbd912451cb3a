use crate::discrete::types::{AnalysisResult, EdgeAggregate, LocationPosterior};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Contribution of a single tree to one migration path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathWeight {
    pub label: String,
    pub weight: f64,
    /// 1-based rank of the path inside its own tree; absent for
    /// zero-filled contributions.
    pub rank: Option<usize>,
}

/// One migration path with its per-tree contributions and the spread
/// between the strongest and weakest supporting tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathDifference {
    pub src: String,
    pub dst: String,
    pub weights: Vec<PathWeight>,
    pub delta: f64,
    pub leading_label: Option<String>,
}

/// Per-tree context carried along with the comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeComparisonSummary {
    pub label: String,
    pub analysis_id: String,
    pub root_distribution: Vec<LocationPosterior>,
    pub top_paths: Vec<EdgeAggregate>,
    pub exports: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub trees: Vec<TreeComparisonSummary>,
    pub path_differences: Vec<PathDifference>,
}

/// Align two or more labelled analyses and rank their divergent
/// migration paths by weight spread. Trees missing a path are
/// zero-filled in input order; `top_k <= 0` keeps the full ranking.
pub fn compare(
    labelled_results: &[(String, AnalysisResult)],
    top_k: i64,
) -> Result<ComparisonResult> {
    if labelled_results.len() < 2 {
        return Err(Error::Validation(
            "at least two labelled analyses are required for comparison".to_string(),
        ));
    }

    let all_labels: Vec<&str> = labelled_results
        .iter()
        .map(|(label, _)| label.as_str())
        .collect();

    let mut tree_summaries = Vec::with_capacity(labelled_results.len());
    let mut path_weights: BTreeMap<(String, String), Vec<PathWeight>> = BTreeMap::new();

    for (label, analysis) in labelled_results {
        tree_summaries.push(TreeComparisonSummary {
            label: label.clone(),
            analysis_id: analysis.analysis_id.clone(),
            root_distribution: analysis.root_distribution.clone(),
            top_paths: analysis.top_paths.clone(),
            exports: analysis.exports.clone(),
        });

        for (index, edge) in analysis.edges.iter().enumerate() {
            path_weights
                .entry((edge.src.clone(), edge.dst.clone()))
                .or_default()
                .push(PathWeight {
                    label: label.clone(),
                    weight: edge.weight,
                    rank: Some(index + 1),
                });
        }
    }

    let mut path_differences: Vec<PathDifference> = Vec::new();
    for ((src, dst), weights) in path_weights {
        let by_label: HashMap<&str, &PathWeight> = weights
            .iter()
            .map(|weight| (weight.label.as_str(), weight))
            .collect();
        let contributions: Vec<PathWeight> = all_labels
            .iter()
            .map(|label| {
                by_label.get(label).map(|w| (*w).clone()).unwrap_or(PathWeight {
                    label: label.to_string(),
                    weight: 0.0,
                    rank: None,
                })
            })
            .collect();

        let max_weight = contributions
            .iter()
            .map(|contribution| contribution.weight)
            .fold(f64::NEG_INFINITY, f64::max);
        let min_weight = contributions
            .iter()
            .map(|contribution| contribution.weight)
            .fold(f64::INFINITY, f64::min);
        let delta = max_weight - min_weight;
        if delta <= 0.0 {
            continue;
        }

        let leading_label = contributions
            .iter()
            .fold(None::<&PathWeight>, |best, contribution| match best {
                Some(current) if current.weight >= contribution.weight => Some(current),
                _ => Some(contribution),
            })
            .map(|contribution| contribution.label.clone());

        path_differences.push(PathDifference {
            src,
            dst,
            weights: contributions,
            delta,
            leading_label,
        });
    }

    path_differences.sort_by(|a, b| {
        b.delta
            .partial_cmp(&a.delta)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if top_k > 0 {
        path_differences.truncate(top_k as usize);
    }

    Ok(ComparisonResult {
        trees: tree_summaries,
        path_differences,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(id: &str, edges: Vec<(&str, &str, f64)>) -> AnalysisResult {
        let edges: Vec<EdgeAggregate> = edges
            .into_iter()
            .map(|(src, dst, weight)| EdgeAggregate {
                src: src.to_string(),
                dst: dst.to_string(),
                weight,
                ..EdgeAggregate::default()
            })
            .collect();
        AnalysisResult {
            analysis_id: id.to_string(),
            root_distribution: Vec::new(),
            top_paths: edges.clone(),
            nodes: Vec::new(),
            edges,
            exports: BTreeMap::new(),
        }
    }

    #[test]
    fn test_compare_requires_two_results() {
        let single = vec![("only".to_string(), analysis("a1", vec![]))];
        assert!(matches!(
            compare(&single, 10),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_disjoint_paths_zero_fill_and_rank() {
        let labelled = vec![
            ("first".to_string(), analysis("a1", vec![("X", "Y", 0.8)])),
            ("second".to_string(), analysis("a2", vec![("P", "Q", 0.6)])),
        ];
        let result = compare(&labelled, 10).unwrap();
        assert_eq!(result.path_differences.len(), 2);

        let top = &result.path_differences[0];
        assert_eq!((top.src.as_str(), top.dst.as_str()), ("X", "Y"));
        assert!((top.delta - 0.8).abs() < 1e-12);
        assert_eq!(top.leading_label.as_deref(), Some("first"));
        // Contributions preserve tree order, zero-filled without a rank.
        assert_eq!(top.weights[0].label, "first");
        assert_eq!(top.weights[0].rank, Some(1));
        assert_eq!(top.weights[1].label, "second");
        assert_eq!(top.weights[1].weight, 0.0);
        assert_eq!(top.weights[1].rank, None);

        assert_eq!(
            (
                result.path_differences[1].src.as_str(),
                result.path_differences[1].dst.as_str()
            ),
            ("P", "Q")
        );
    }

    #[test]
    fn test_equal_weights_are_excluded() {
        let labelled = vec![
            ("first".to_string(), analysis("a1", vec![("X", "Y", 0.5)])),
            ("second".to_string(), analysis("a2", vec![("X", "Y", 0.5)])),
        ];
        let result = compare(&labelled, 10).unwrap();
        assert!(result.path_differences.is_empty());
    }

    #[test]
    fn test_top_k_zero_returns_all() {
        let labelled = vec![
            (
                "first".to_string(),
                analysis("a1", vec![("X", "Y", 0.8), ("P", "Q", 0.4)]),
            ),
            ("second".to_string(), analysis("a2", vec![("X", "Y", 0.1)])),
        ];
        let all = compare(&labelled, 0).unwrap();
        assert_eq!(all.path_differences.len(), 2);
        let truncated = compare(&labelled, 1).unwrap();
        assert_eq!(truncated.path_differences.len(), 1);
    }
}
