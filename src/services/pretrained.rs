// src/services/pretrained.rs
use anyhow::{bail, Context, Result};
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The pre-trained model shipped next to the service. Loaded at startup and
/// kept in the application state; no route reads it.
#[derive(Debug)]
pub struct ModelArtifact {
    path: PathBuf,
    contents: ArtifactContents,
}

#[derive(Debug)]
pub enum ArtifactContents {
    /// Single-file archive.
    File(Vec<u8>),
    /// Saved-model directory; number of top-level entries.
    Directory(usize),
}

impl ModelArtifact {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)
            .with_context(|| format!("model artifact {} not found", path.display()))?;

        let contents = if metadata.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to list model directory {}", path.display()))?
                .count();
            if entries == 0 {
                bail!("model directory {} is empty", path.display());
            }
            ArtifactContents::Directory(entries)
        } else {
            let bytes = fs::read(path)
                .with_context(|| format!("failed to read model file {}", path.display()))?;
            if bytes.is_empty() {
                bail!("model file {} is empty", path.display());
            }
            ArtifactContents::File(bytes)
        };

        Ok(Self {
            path: path.to_path_buf(),
            contents,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contents(&self) -> &ArtifactContents {
        &self.contents
    }
}

/// Loads the artifact, logging rather than failing when it is unusable.
pub fn load_or_log(path: &Path) -> Option<Arc<ModelArtifact>> {
    match ModelArtifact::load(path) {
        Ok(model) => {
            info!("Model loaded successfully from {} ({})", model.path().display(), summary(&model));
            Some(Arc::new(model))
        }
        Err(e) => {
            error!("Error loading model: {:#}", e);
            None
        }
    }
}

fn summary(model: &ModelArtifact) -> String {
    match model.contents() {
        ArtifactContents::File(bytes) => format!("{} bytes", bytes.len()),
        ArtifactContents::Directory(entries) => format!("{} entries", entries),
    }
}
