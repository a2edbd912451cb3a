use phylogeo_tools::config::config::Config;
use phylogeo_tools::discrete::run_discrete_analysis;
use phylogeo_tools::error::Error;
use phylogeo_tools::export::FsArtifactPublisher;
use phylogeo_tools::tree::{parse_tree, TreeNode, TreePayload};
use std::path::Path;

const ANNOTATED_TREE: &[u8] = b"(A[&location=\"France\",latitude=48.857,longitude=2.352]:2.0,B[&location=\"Germany\",latitude=52.52,longitude=13.405]:3.0)[&state_prob={0.7,0.3},state_set={Germany,France}];";

fn fixture() -> (tempfile::TempDir, TreePayload, FsArtifactPublisher) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        default_tree: None,
    };
    let payload = parse_tree(ANNOTATED_TREE, None).unwrap();
    let publisher = FsArtifactPublisher::new(&config);
    (dir, payload, publisher)
}

#[test]
fn root_distribution_is_ranked_and_normalized() {
    let (_dir, payload, publisher) = fixture();
    let result =
        run_discrete_analysis(&payload.nodes, &payload.edges, None, 10, &publisher).unwrap();

    assert_eq!(result.root_distribution.len(), 2);
    assert_eq!(result.root_distribution[0].location, "Germany");
    assert!((result.root_distribution[0].probability - 0.7).abs() < 1e-12);
    assert_eq!(result.root_distribution[1].location, "France");
    let total: f64 = result
        .root_distribution
        .iter()
        .map(|entry| entry.probability)
        .sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn edges_are_weighted_cross_products_sorted_by_weight() {
    let (_dir, payload, publisher) = fixture();
    let result =
        run_discrete_analysis(&payload.nodes, &payload.edges, None, 10, &publisher).unwrap();

    assert_eq!(result.edges.len(), 2);
    // Root Germany(0.7) into tip France dominates root France(0.3) into
    // tip Germany.
    assert_eq!(result.edges[0].src, "Germany");
    assert_eq!(result.edges[0].dst, "France");
    assert!((result.edges[0].weight - 0.7).abs() < 1e-12);
    assert_eq!(result.edges[1].src, "France");
    assert_eq!(result.edges[1].dst, "Germany");
    assert!((result.edges[1].weight - 0.3).abs() < 1e-12);

    // Single-observation weighted medians are the observation values:
    // tip A sits 1.0 before present, tip B at 0.0.
    assert_eq!(result.edges[0].time_median, Some(1.0));
    assert_eq!(result.edges[1].time_median, Some(0.0));
}

#[test]
fn node_aggregates_split_ancestral_and_tip_mass() {
    let (_dir, payload, publisher) = fixture();
    let result =
        run_discrete_analysis(&payload.nodes, &payload.edges, None, 10, &publisher).unwrap();

    assert_eq!(result.nodes.len(), 2);
    let france = &result.nodes[0];
    assert_eq!(france.location, "France");
    assert!((france.ancestral_weight - 0.3).abs() < 1e-12);
    assert!((france.tip_weight - 1.0).abs() < 1e-12);
    assert_eq!(france.latitude, Some(48.857));
    assert_eq!(france.longitude, Some(2.352));

    let germany = &result.nodes[1];
    assert_eq!(germany.location, "Germany");
    assert!((germany.ancestral_weight - 0.7).abs() < 1e-12);
    assert!((germany.tip_weight - 1.0).abs() < 1e-12);
}

#[test]
fn support_table_merges_into_matching_aggregate() {
    let (_dir, payload, publisher) = fixture();
    let support = "location.Germany,France.bf\tstate\n6.0\t1\n10.0\t2\n";
    let result =
        run_discrete_analysis(&payload.nodes, &payload.edges, Some(support), 10, &publisher)
            .unwrap();

    assert_eq!(result.edges[0].bayes_factor, Some(8.0));
    assert_eq!(result.edges[1].bayes_factor, None);
}

#[test]
fn top_k_zero_keeps_the_full_ranking() {
    let (_dir, payload, publisher) = fixture();
    let all = run_discrete_analysis(&payload.nodes, &payload.edges, None, 0, &publisher).unwrap();
    assert_eq!(all.top_paths.len(), all.edges.len());

    let negative =
        run_discrete_analysis(&payload.nodes, &payload.edges, None, -3, &publisher).unwrap();
    assert_eq!(negative.top_paths.len(), negative.edges.len());

    let one = run_discrete_analysis(&payload.nodes, &payload.edges, None, 1, &publisher).unwrap();
    assert_eq!(one.top_paths.len(), 1);
}

#[test]
fn rerun_is_deterministic_apart_from_the_identifier() {
    let (_dir, payload, publisher) = fixture();
    let first =
        run_discrete_analysis(&payload.nodes, &payload.edges, None, 10, &publisher).unwrap();
    let second =
        run_discrete_analysis(&payload.nodes, &payload.edges, None, 10, &publisher).unwrap();

    assert_ne!(first.analysis_id, second.analysis_id);
    assert_eq!(first.root_distribution, second.root_distribution);
    assert_eq!(first.top_paths, second.top_paths);
    assert_eq!(first.nodes, second.nodes);
    assert_eq!(first.edges, second.edges);
}

#[test]
fn artifacts_are_published_and_round_trippable() {
    let (dir, payload, publisher) = fixture();
    let result =
        run_discrete_analysis(&payload.nodes, &payload.edges, None, 10, &publisher).unwrap();

    let analysis_dir = dir.path().join("analysis").join(&result.analysis_id);
    for artifact in ["nodes.csv", "edges.csv", "map.geojson", "summary.md"] {
        assert!(analysis_dir.join(artifact).is_file(), "missing {}", artifact);
    }
    assert_eq!(result.exports.len(), 4);
    assert!(Path::new(&result.exports["nodes_csv"]).is_file());

    // The location table re-derives as label/number records.
    let mut reader = csv::Reader::from_path(analysis_dir.join("nodes.csv")).unwrap();
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][0], "France");
    assert!((records[0][1].parse::<f64>().unwrap() - 0.3).abs() < 1e-9);
    assert!((records[0][2].parse::<f64>().unwrap() - 1.0).abs() < 1e-9);

    // The feature collection encodes (longitude, latitude) pairs.
    let geojson: serde_json::Value =
        serde_json::from_slice(&std::fs::read(analysis_dir.join("map.geojson")).unwrap()).unwrap();
    let features = geojson["features"].as_array().unwrap();
    // Two located points and both transitions.
    assert_eq!(features.len(), 4);
    let point = features
        .iter()
        .find(|feature| feature["properties"]["location"] == "Germany")
        .unwrap();
    let coordinates = point["geometry"]["coordinates"].as_array().unwrap();
    assert_eq!(coordinates[0].as_f64(), Some(13.405));
    assert_eq!(coordinates[1].as_f64(), Some(52.52));

    let summary =
        String::from_utf8(std::fs::read(analysis_dir.join("summary.md")).unwrap()).unwrap();
    assert!(summary.contains("# Discrete Trait Summary"));
    assert!(summary.contains("Germany → France"));
}

#[test]
fn unannotated_tree_degrades_to_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        default_tree: None,
    };
    let publisher = FsArtifactPublisher::new(&config);
    let payload = parse_tree(b"(A:1.0,B:2.0);", None).unwrap();
    let result =
        run_discrete_analysis(&payload.nodes, &payload.edges, None, 10, &publisher).unwrap();

    assert_eq!(result.root_distribution.len(), 1);
    assert_eq!(result.root_distribution[0].location, "Unknown");
    assert_eq!(result.root_distribution[0].probability, 1.0);
    // Every cross product pairs Unknown with Unknown, so no transitions.
    assert!(result.edges.is_empty());
}

#[test]
fn empty_payload_and_multi_root_fail_validation() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        default_tree: None,
    };
    let publisher = FsArtifactPublisher::new(&config);

    let err = run_discrete_analysis(&[], &[], None, 10, &publisher).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let mut payload = parse_tree(ANNOTATED_TREE, None).unwrap();
    let orphan = TreeNode {
        id: "n99".to_string(),
        label: None,
        parent_id: None,
        branch_length: None,
        time_from_root: 0.0,
        time_before_present: 0.0,
        annotations: Default::default(),
    };
    payload.nodes.push(orphan);
    let err =
        run_discrete_analysis(&payload.nodes, &payload.edges, None, 10, &publisher).unwrap_err();
    match err {
        Error::Validation(message) => assert!(message.contains("exactly one root")),
        other => panic!("expected validation error, got {:?}", other),
    }
}
