//! Save targets for finished documents.

use async_trait::async_trait;
use coverpress_types::PageDocument;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("failed to save '{file_name}': {message}")]
    Failed { file_name: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SaveError {
    fn from(err: std::io::Error) -> Self {
        SaveError::Io(err.to_string())
    }
}

/// Hands a finished document to the user (a browser download, a file on disk).
///
/// The pipeline calls `save` at most once per invocation, and only after
/// every other stage has succeeded.
#[async_trait(?Send)]
pub trait DocumentSink {
    async fn save(
        &self,
        file_name: &str,
        media_type: &str,
        document: &PageDocument,
    ) -> Result<(), SaveError>;
}

/// One document received by an [`InMemorySink`].
#[derive(Debug, Clone)]
pub struct SavedDocument {
    pub file_name: String,
    pub media_type: String,
    pub document: PageDocument,
}

/// Keeps every saved document in memory, in save order.
#[derive(Debug, Default)]
pub struct InMemorySink {
    saved: RwLock<Vec<SavedDocument>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything saved so far.
    ///
    /// Returns an empty list if the lock is poisoned.
    pub fn saved(&self) -> Vec<SavedDocument> {
        self.saved.read().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.saved.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait(?Send)]
impl DocumentSink for InMemorySink {
    async fn save(
        &self,
        file_name: &str,
        media_type: &str,
        document: &PageDocument,
    ) -> Result<(), SaveError> {
        let mut saved = self.saved.write().map_err(|_| SaveError::Failed {
            file_name: file_name.to_string(),
            message: "sink lock poisoned".to_string(),
        })?;
        saved.push(SavedDocument {
            file_name: file_name.to_string(),
            media_type: media_type.to_string(),
            document: document.clone(),
        });
        Ok(())
    }
}
