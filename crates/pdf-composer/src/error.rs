use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("no documents to merge")]
    NoInputs,

    #[error("document {index} is not a well-formed PDF: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: lopdf::Error,
    },

    #[error("document {index} is encrypted")]
    Encrypted { index: usize },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("failed to write merged document: {0}")]
    Write(String),
}
