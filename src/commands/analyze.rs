use crate::config::config::Config;
use crate::discrete;
use crate::export::FsArtifactPublisher;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;

pub fn run(
    tree_file: Option<String>,
    support_file: Option<String>,
    top_k: i64,
    output_file: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let name = super::resolve_tree_name(&config, tree_file)?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    progress.set_message("Parsing MCC tree...");
    let payload = super::load_payload(&config, &name)?;

    // Support tables may arrive in odd encodings; decode permissively.
    let support_text = match support_file {
        Some(path) => Some(String::from_utf8_lossy(&fs::read(path)?).into_owned()),
        None => None,
    };

    progress.set_message("Aggregating migration paths...");
    let publisher = FsArtifactPublisher::new(&config);
    let result = discrete::run_discrete_analysis(
        &payload.nodes,
        &payload.edges,
        support_text.as_deref(),
        top_k,
        &publisher,
    )?;
    progress.finish_with_message(format!("Analysis {} complete", result.analysis_id));

    let json = serde_json::to_string_pretty(&result)?;
    super::write_output(output_file.as_deref(), &json)?;
    Ok(())
}
