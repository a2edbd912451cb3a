use crate::comparison;
use crate::config::config::Config;
use crate::discrete::{self, AnalysisResult};
use crate::error::Error;
use crate::export::FsArtifactPublisher;
use indicatif::{ProgressBar, ProgressStyle};

pub fn run(
    tree_files: Vec<String>,
    labels: Vec<String>,
    top_k: i64,
    output_file: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !labels.is_empty() && labels.len() != tree_files.len() {
        return Err(Box::new(Error::Validation(
            "labels length must match the number of tree files".to_string(),
        )));
    }

    let config = Config::load();
    let publisher = FsArtifactPublisher::new(&config);

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );

    let mut labelled_results: Vec<(String, AnalysisResult)> = Vec::new();
    for (index, tree_file) in tree_files.iter().enumerate() {
        progress.set_message(format!("Analyzing {}...", tree_file));
        let payload = super::load_payload(&config, tree_file)?;
        let result = discrete::run_discrete_analysis(
            &payload.nodes,
            &payload.edges,
            None,
            top_k,
            &publisher,
        )?;
        let label = labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("Tree {}", index + 1));
        labelled_results.push((label, result));
    }

    progress.set_message("Ranking divergent paths...");
    let result = comparison::compare(&labelled_results, top_k)?;
    progress.finish_with_message(format!(
        "Compared {} trees, {} divergent paths",
        result.trees.len(),
        result.path_differences.len()
    ));

    let json = serde_json::to_string_pretty(&result)?;
    super::write_output(output_file.as_deref(), &json)?;
    Ok(())
}
