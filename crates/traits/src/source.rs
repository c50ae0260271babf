//! Companion files supplied by the caller for one invocation.

use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("failed to read '{name}': {message}")]
    ReadFailed { name: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Io(err.to_string())
    }
}

/// A binary file handle. The pipeline reads it at most once and never keeps
/// it beyond the invocation it was passed to.
#[async_trait(?Send)]
pub trait CompanionSource: Debug {
    /// File name including extension; the media kind is inferred from it.
    fn name(&self) -> &str;

    /// Size in bytes as declared by the handle.
    fn size(&self) -> u64;

    async fn read(&self) -> Result<Vec<u8>, SourceError>;
}

/// A companion whose bytes are already in memory.
#[derive(Debug, Clone)]
pub struct InMemoryCompanion {
    name: String,
    bytes: Vec<u8>,
}

impl InMemoryCompanion {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[async_trait(?Send)]
impl CompanionSource for InMemoryCompanion {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    async fn read(&self) -> Result<Vec<u8>, SourceError> {
        Ok(self.bytes.clone())
    }
}
