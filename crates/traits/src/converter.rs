use async_trait::async_trait;
use coverpress_types::PageDocument;
use thiserror::Error;

/// Shown to users whenever a companion document cannot be converted.
pub const CONVERSION_USER_MESSAGE: &str =
    "Cannot convert this document. Please ensure it is a valid, supported Word document.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("not a valid document: {0}")]
    InvalidDocument(String),

    #[error("converted markup could not be staged: {0}")]
    Staging(String),

    #[error("converted markup could not be rendered: {0}")]
    Render(String),

    #[error("converted pages could not be assembled: {0}")]
    Pagination(String),
}

impl ConversionError {
    pub fn user_message(&self) -> &'static str {
        CONVERSION_USER_MESSAGE
    }
}

/// Turns a foreign document format into a mergeable page document.
#[async_trait(?Send)]
pub trait FormatConverter {
    async fn convert(&self, bytes: &[u8]) -> Result<PageDocument, ConversionError>;
}
