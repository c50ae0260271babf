//! The pipeline's error type.

use coverpress_pdf_composer::MergeError;
use coverpress_traits::{BuildError, CaptureError, ConversionError, SaveError, SourceError};
use thiserror::Error;

/// Why an invocation failed. Every variant is terminal for the invocation.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),
    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),
    #[error("Other pipeline error: {0}")]
    Other(String),
}

/// Coarse classification of a [`PipelineError`] for callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Capture,
    Conversion,
    Merge,
    Pipeline,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Capture => "CAPTURE_ERROR",
            ErrorKind::Conversion => "CONVERSION_ERROR",
            ErrorKind::Merge => "MERGE_ERROR",
            ErrorKind::Pipeline => "PIPELINE_ERROR",
        }
    }
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Capture(_) => ErrorKind::Capture,
            PipelineError::Conversion(_) => ErrorKind::Conversion,
            PipelineError::Merge(_) => ErrorKind::Merge,
            PipelineError::Other(_) => ErrorKind::Pipeline,
        }
    }

    /// A message fit to show an end user.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Conversion(e) => e.user_message().to_string(),
            PipelineError::Merge(_) => {
                "The documents could not be combined. Please ensure you uploaded a valid PDF file and try again."
                    .to_string()
            }
            _ => "An error occurred while generating the document. Please try again.".to_string(),
        }
    }
}

impl From<BuildError> for PipelineError {
    fn from(e: BuildError) -> Self {
        PipelineError::Other(format!("Cover page could not be built: {}", e))
    }
}

impl From<SourceError> for PipelineError {
    fn from(e: SourceError) -> Self {
        PipelineError::Other(e.to_string())
    }
}

impl From<SaveError> for PipelineError {
    fn from(e: SaveError) -> Self {
        PipelineError::Other(e.to_string())
    }
}
