pub mod formats;

use crate::config::config::Config;
use crate::error::Result;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Persists named analysis artifacts and issues retrievable locators.
///
/// Each analysis writes under a freshly allocated opaque identifier, so
/// concurrent analyses never contend for the same output location.
pub trait ArtifactPublisher {
    fn allocate_id(&self) -> String;
    fn write(&self, id: &str, artifact_name: &str, bytes: &[u8]) -> Result<()>;
    fn reference(&self, id: &str, artifact_name: &str) -> String;
}

/// Publisher writing artifacts under `<data_dir>/analysis/<id>/`.
pub struct FsArtifactPublisher {
    analysis_dir: PathBuf,
}

impl FsArtifactPublisher {
    pub fn new(config: &Config) -> Self {
        Self {
            analysis_dir: config.data_dir.join("analysis"),
        }
    }
}

impl ArtifactPublisher for FsArtifactPublisher {
    fn allocate_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn write(&self, id: &str, artifact_name: &str, bytes: &[u8]) -> Result<()> {
        let directory = self.analysis_dir.join(id);
        fs::create_dir_all(&directory)?;
        fs::write(directory.join(artifact_name), bytes)?;
        Ok(())
    }

    fn reference(&self, id: &str, artifact_name: &str) -> String {
        self.analysis_dir
            .join(id)
            .join(artifact_name)
            .display()
            .to_string()
    }
}
