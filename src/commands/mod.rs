pub mod analyze;
pub mod compare;
pub mod matrix;
pub mod tree;

use crate::config::config::Config;
use crate::error::{Error, Result};
use crate::store::{FsTreeStore, TreeStore};
use crate::tree::TreePayload;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Resolve the tree argument, falling back to the configured default.
pub(crate) fn resolve_tree_name(config: &Config, tree_file: Option<String>) -> Result<String> {
    match tree_file {
        Some(name) => Ok(name),
        None => config
            .default_tree
            .as_ref()
            .map(|path| path.display().to_string())
            .ok_or_else(|| {
                Error::NotFound(
                    "no MCC tree provided; pass a tree file or set PHYLOGEO_TREE_PATH".to_string(),
                )
            }),
    }
}

pub(crate) fn load_payload(config: &Config, name: &str) -> Result<TreePayload> {
    let store = FsTreeStore::new(config);
    let bytes = store.resolve(name)?;
    crate::tree::parse_tree(&bytes, Some(name))
}

pub(crate) fn write_output(output_file: Option<&str>, content: &str) -> std::io::Result<()> {
    match output_file {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "{}", content)?;
        }
        None => println!("{}", content),
    }
    Ok(())
}
