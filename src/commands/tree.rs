use crate::config::config::Config;
use indicatif::{ProgressBar, ProgressStyle};

pub fn run(
    tree_file: Option<String>,
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
    progress.finish_with_message(format!(
        "Parsed {} nodes, {} edges ({} tips)",
        payload.nodes.len(),
        payload.edges.len(),
        payload.metadata.tip_count
    ));

    let json = serde_json::to_string_pretty(&payload)?;
    super::write_output(output_file.as_deref(), &json)?;
    Ok(())
}
