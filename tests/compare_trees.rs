use phylogeo_tools::comparison::compare;
use phylogeo_tools::config::config::Config;
use phylogeo_tools::discrete::{run_discrete_analysis, AnalysisResult};
use phylogeo_tools::export::FsArtifactPublisher;
use phylogeo_tools::matrix::build_migration_matrix;
use phylogeo_tools::tree::parse_tree;

fn analyse(tree: &[u8], publisher: &FsArtifactPublisher) -> AnalysisResult {
    let payload = parse_tree(tree, None).unwrap();
    run_discrete_analysis(&payload.nodes, &payload.edges, None, 10, publisher).unwrap()
}

#[test]
fn compared_trees_rank_divergent_paths() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        default_tree: None,
    };
    let publisher = FsArtifactPublisher::new(&config);

    // Both trees support Germany -> France, with different strength; only
    // the first supports Germany -> Spain.
    let first = analyse(
        b"(A[&location=\"France\"]:1.0,B[&location=\"Spain\"]:1.0)[&location=\"Germany\"];",
        &publisher,
    );
    let second = analyse(
        b"(A[&location=\"France\"]:1.0,B[&location=\"Germany\"]:1.0)[&location=\"Germany\"];",
        &publisher,
    );

    let labelled = vec![
        ("strict".to_string(), first),
        ("relaxed".to_string(), second),
    ];
    let result = compare(&labelled, 10).unwrap();

    assert_eq!(result.trees.len(), 2);
    assert_eq!(result.trees[0].label, "strict");

    // Germany -> France appears in both with weight 1.0, so it carries no
    // divergence; Germany -> Spain survives with the full delta.
    assert_eq!(result.path_differences.len(), 1);
    let difference = &result.path_differences[0];
    assert_eq!(difference.src, "Germany");
    assert_eq!(difference.dst, "Spain");
    assert!((difference.delta - 1.0).abs() < 1e-12);
    assert_eq!(difference.leading_label.as_deref(), Some("strict"));
    assert_eq!(difference.weights.len(), 2);
    assert_eq!(difference.weights[1].weight, 0.0);
    assert_eq!(difference.weights[1].rank, None);
}

#[test]
fn migration_matrix_counts_from_parsed_tree() {
    let payload = parse_tree(
        b"((A[&location=\"France\"]:1.0,B[&location=\"France\"]:1.0)[&location=\"Germany\"]:1.0,C[&location=\"Spain\"]:2.0)[&location=\"Germany\"];",
        None,
    )
    .unwrap();
    let matrix = build_migration_matrix(&payload);

    assert_eq!(matrix.sources, vec!["Germany".to_string()]);
    assert_eq!(
        matrix.targets,
        vec!["France".to_string(), "Spain".to_string()]
    );
    assert_eq!(matrix.counts, vec![vec![2, 1]]);
}
