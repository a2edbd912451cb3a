pub mod distribution;
pub mod stats;
pub mod support;
pub mod timeline;
pub mod types;

pub use self::types::{AnalysisResult, EdgeAggregate, LocationPosterior, NodeAggregate};

use self::distribution::LocationDistribution;
use self::stats::{EdgeObservation, LocationAccumulator};
use crate::error::{Error, Result};
use crate::export::formats;
use crate::export::ArtifactPublisher;
use crate::tree::{TreeEdge, TreeNode};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Run the discrete trait analysis over a parsed tree and publish the
/// derived artifacts.
///
/// `top_k` bounds the highlighted pathway list; zero or negative means
/// the full ranking. The optional support table text merges BSSVS /
/// Markov jump metrics into matching transition aggregates.
pub fn run_discrete_analysis(
    nodes: &[TreeNode],
    edges: &[TreeEdge],
    support_table: Option<&str>,
    top_k: i64,
    publisher: &dyn ArtifactPublisher,
) -> Result<AnalysisResult> {
    if nodes.is_empty() {
        return Err(Error::Validation(
            "tree payload has no nodes to analyse".to_string(),
        ));
    }

    let node_lookup: HashMap<&str, &TreeNode> =
        nodes.iter().map(|node| (node.id.as_str(), node)).collect();
    let parents_with_children: HashSet<&str> =
        edges.iter().map(|edge| edge.parent_id.as_str()).collect();

    let distributions: HashMap<&str, LocationDistribution> = nodes
        .iter()
        .map(|node| {
            (
                node.id.as_str(),
                distribution::normalize(distribution::extract_distribution(&node.annotations)),
            )
        })
        .collect();

    let roots: Vec<&TreeNode> = nodes.iter().filter(|node| node.parent_id.is_none()).collect();
    if roots.len() != 1 {
        return Err(Error::Validation(format!(
            "MCC tree must have exactly one root; received {} nodes without a parent",
            roots.len()
        )));
    }
    let root_distribution = distributions[roots[0].id.as_str()].clone();

    let reference_year = timeline::infer_reference_year(nodes);

    let mut ancestral_weight: BTreeMap<String, f64> = BTreeMap::new();
    let mut tip_weight: BTreeMap<String, f64> = BTreeMap::new();
    let mut location_stats: BTreeMap<String, LocationAccumulator> = BTreeMap::new();

    for node in nodes {
        let node_distribution = &distributions[node.id.as_str()];
        let (best_location, best_probability) = distribution::best_state(node_distribution);

        let bucket = if parents_with_children.contains(node.id.as_str()) {
            &mut ancestral_weight
        } else {
            &mut tip_weight
        };
        for (location, probability) in node_distribution {
            *bucket.entry(location.clone()).or_insert(0.0) += probability;
        }

        if let Some((latitude, longitude)) = distribution::extract_coordinates(&node.annotations) {
            location_stats
                .entry(best_location)
                .or_default()
                .add(latitude, longitude, best_probability.max(0.0));
        }
    }

    let mut observations: BTreeMap<(String, String), Vec<EdgeObservation>> = BTreeMap::new();
    for edge in edges {
        let (Some(parent), Some(child)) = (
            node_lookup.get(edge.parent_id.as_str()),
            node_lookup.get(edge.child_id.as_str()),
        ) else {
            continue;
        };
        let parent_distribution = &distributions[parent.id.as_str()];
        let child_distribution = &distributions[child.id.as_str()];
        if parent_distribution.is_empty() || child_distribution.is_empty() {
            continue;
        }
        let (time_median, hpd_low, hpd_high) = timeline::extract_time_stats(child, reference_year);
        for (src, src_probability) in parent_distribution {
            for (dst, dst_probability) in child_distribution {
                if src == dst {
                    continue;
                }
                let weight = src_probability * dst_probability;
                if weight <= 0.0 {
                    continue;
                }
                observations
                    .entry((src.clone(), dst.clone()))
                    .or_default()
                    .push(EdgeObservation {
                        weight,
                        time_median,
                        hpd_low,
                        hpd_high,
                    });
            }
        }
    }

    let support_metrics = support_table
        .map(support::parse_support_table)
        .unwrap_or_default();

    let mut edge_summaries: Vec<EdgeAggregate> = observations
        .iter()
        .map(|((src, dst), observed)| {
            stats::summarize_edge(src, dst, observed, support_metrics.get(&(src.clone(), dst.clone())))
        })
        .filter(|aggregate| aggregate.weight > 0.0)
        .collect();
    edge_summaries.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));

    let observed_locations: BTreeSet<&String> =
        ancestral_weight.keys().chain(tip_weight.keys()).collect();
    let node_summaries: Vec<NodeAggregate> = observed_locations
        .into_iter()
        .map(|location| {
            let coordinate = location_stats
                .get(location)
                .and_then(LocationAccumulator::mean);
            NodeAggregate {
                location: location.clone(),
                ancestral_weight: ancestral_weight.get(location).copied().unwrap_or(0.0),
                tip_weight: tip_weight.get(location).copied().unwrap_or(0.0),
                latitude: coordinate.map(|(latitude, _)| latitude),
                longitude: coordinate.map(|(_, longitude)| longitude),
            }
        })
        .collect();

    let mut root_rank: Vec<LocationPosterior> = root_distribution
        .iter()
        .map(|(location, probability)| LocationPosterior {
            location: location.clone(),
            probability: *probability,
        })
        .collect();
    root_rank.sort_by(|a, b| b.probability.partial_cmp(&a.probability).unwrap_or(Ordering::Equal));

    let top_paths: Vec<EdgeAggregate> = if top_k <= 0 {
        edge_summaries.clone()
    } else {
        edge_summaries.iter().take(top_k as usize).cloned().collect()
    };

    let analysis_id = publisher.allocate_id();
    publisher.write(
        &analysis_id,
        "nodes.csv",
        &formats::tables::render_nodes_csv(&node_summaries)?,
    )?;
    publisher.write(
        &analysis_id,
        "edges.csv",
        &formats::tables::render_edges_csv(&edge_summaries)?,
    )?;
    publisher.write(
        &analysis_id,
        "map.geojson",
        &formats::geo::render_map_geojson(&node_summaries, &edge_summaries)?,
    )?;
    publisher.write(
        &analysis_id,
        "summary.md",
        formats::summary::render_summary(&root_rank, &top_paths).as_bytes(),
    )?;

    let exports: BTreeMap<String, String> = [
        ("nodes_csv", "nodes.csv"),
        ("edges_csv", "edges.csv"),
        ("map_geojson", "map.geojson"),
        ("summary_md", "summary.md"),
    ]
    .into_iter()
    .map(|(key, artifact)| (key.to_string(), publisher.reference(&analysis_id, artifact)))
    .collect();

    Ok(AnalysisResult {
        analysis_id,
        root_distribution: root_rank,
        top_paths,
        nodes: node_summaries,
        edges: edge_summaries,
        exports,
    })
}
