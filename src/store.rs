use crate::config::config::Config;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves stored tree names to raw bytes.
///
/// The core never manages storage policy; it only consumes bytes or a
/// typed not-found signal from this boundary.
pub trait TreeStore {
    fn resolve(&self, name: &str) -> Result<Vec<u8>>;
}

/// Filesystem store rooted at the configured data directory. Absolute
/// paths and paths that already exist are honored as given; bare names
/// resolve relative to the data directory.
pub struct FsTreeStore {
    data_dir: PathBuf,
}

impl FsTreeStore {
    pub fn new(config: &Config) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
        }
    }

    /// Persist an uploaded tree under the data directory and return the
    /// stored path.
    pub fn store(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.data_dir)?;
        let target = self.data_dir.join(name);
        fs::write(&target, bytes)?;
        Ok(target)
    }

    fn locate(&self, name: &str) -> PathBuf {
        let candidate = Path::new(name);
        if candidate.is_absolute() || candidate.exists() {
            candidate.to_path_buf()
        } else {
            self.data_dir.join(candidate)
        }
    }
}

impl TreeStore for FsTreeStore {
    fn resolve(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.locate(name);
        if !path.is_file() {
            return Err(Error::NotFound(format!(
                "tree file not found: {}",
                path.display()
            )));
        }
        fs::read(&path).map_err(Error::from)
    }
}
