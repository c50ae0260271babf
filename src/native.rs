//! Filesystem adapters for native platforms.

use async_trait::async_trait;
use coverpress_traits::{CompanionSource, DocumentSink, SaveError, SourceError};
use coverpress_types::PageDocument;
use log::{debug, info};
use std::path::{Component, Path, PathBuf};

/// Writes finished documents into a directory under their derived file name.
///
/// File names that would resolve outside the directory are rejected.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    /// The directory is created on first save if it does not exist.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn target(&self, file_name: &str) -> Option<PathBuf> {
        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Some(self.directory.join(name)),
            _ => None,
        }
    }
}

#[async_trait(?Send)]
impl DocumentSink for DirectorySink {
    async fn save(
        &self,
        file_name: &str,
        _media_type: &str,
        document: &PageDocument,
    ) -> Result<(), SaveError> {
        let path = self.target(file_name).ok_or_else(|| SaveError::Failed {
            file_name: file_name.to_string(),
            message: "file name must not contain path components".to_string(),
        })?;
        tokio::fs::create_dir_all(&self.directory).await?;
        tokio::fs::write(&path, document.as_bytes()).await?;
        info!("Wrote {} bytes to {}", document.len(), path.display());
        Ok(())
    }
}

/// A companion file on disk. Its size is taken when the handle is opened.
#[derive(Debug, Clone)]
pub struct FsCompanion {
    path: PathBuf,
    name: String,
    size: u64,
}

impl FsCompanion {
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(SourceError::ReadFailed {
                name: path.display().to_string(),
                message: "not a regular file".to_string(),
            });
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path,
            name,
            size: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait(?Send)]
impl CompanionSource for FsCompanion {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read(&self) -> Result<Vec<u8>, SourceError> {
        debug!("Reading companion file {}", self.path.display());
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| SourceError::ReadFailed {
                name: self.name.clone(),
                message: e.to_string(),
            })
    }
}
