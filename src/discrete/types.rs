use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Posterior probability of a single candidate location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPosterior {
    pub location: String,
    pub probability: f64,
}

/// Per-location summary across the whole tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAggregate {
    pub location: String,
    /// Posterior mass assigned to internal nodes for this location.
    pub ancestral_weight: f64,
    /// Posterior mass assigned to terminal nodes for this location.
    pub tip_weight: f64,
    /// Probability-weighted mean coordinate, when the tree carried one.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Aggregated transition statistics between two locations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeAggregate {
    pub src: String,
    pub dst: String,
    /// Summed posterior weight; interpretable as an expected transition count.
    pub weight: f64,
    /// Weighted median transition time (calendar year when dates could be
    /// inferred, otherwise time before present).
    pub time_median: Option<f64>,
    pub time_hpd_low: Option<f64>,
    pub time_hpd_high: Option<f64>,
    /// Bayes Factor support merged from a BSSVS table when supplied.
    pub bayes_factor: Option<f64>,
    /// Posterior inclusion probability for the transition, clamped to [0, 1].
    pub posterior_support: Option<f64>,
    /// Mean Markov jump count for the transition.
    pub jumps_mean: Option<f64>,
    pub jumps_hpd_low: Option<f64>,
    pub jumps_hpd_high: Option<f64>,
}

/// Everything a discrete trait analysis produces: the root origin
/// ranking, aggregate tables and references to the published artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis_id: String,
    pub root_distribution: Vec<LocationPosterior>,
    pub top_paths: Vec<EdgeAggregate>,
    pub nodes: Vec<NodeAggregate>,
    pub edges: Vec<EdgeAggregate>,
    /// Artifact name to retrievable locator, as issued by the publisher.
    pub exports: BTreeMap<String, String>,
}
