use crate::config::config::Config;
use crate::matrix::build_migration_matrix;

pub fn run(
    tree_file: Option<String>,
    output_file: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let name = super::resolve_tree_name(&config, tree_file)?;
    let payload = super::load_payload(&config, &name)?;

    let matrix = build_migration_matrix(&payload);
    let json = serde_json::to_string_pretty(&matrix)?;
    super::write_output(output_file.as_deref(), &json)?;
    Ok(())
}
