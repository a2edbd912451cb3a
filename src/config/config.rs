use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Process-wide configuration, established once at startup and passed by
/// reference to the components that need it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding uploaded trees and published analysis artifacts.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Tree file to fall back on when a command names none.
    #[serde(default)]
    pub default_tree: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_tree: None,
        }
    }
}

impl Config {
    /// Load configuration from the per-user config file, then apply
    /// environment overrides (`PHYLOGEO_DATA_DIR`, `PHYLOGEO_TREE_PATH`).
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(proj_dirs) = ProjectDirs::from("com", "phylogeo", "phylogeo-tools") {
            let config_path = proj_dirs.config_dir().join("config.toml");
            if config_path.exists() {
                if let Ok(content) = fs::read_to_string(config_path) {
                    if let Ok(parsed) = toml::from_str(&content) {
                        config = parsed;
                    }
                }
            }
        }

        if let Ok(dir) = std::env::var("PHYLOGEO_DATA_DIR") {
            if !dir.is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }
        if let Ok(path) = std::env::var("PHYLOGEO_TREE_PATH") {
            if !path.is_empty() {
                config.default_tree = Some(PathBuf::from(path));
            }
        }

        config
    }
}
