use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocxError {
    #[error("not a Word package: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("package part '{0}' is missing")]
    MissingPart(String),

    #[error("failed to read package part '{part}': {source}")]
    Read {
        part: String,
        #[source]
        source: std::io::Error,
    },

    #[error("package part '{part}' is not valid UTF-8")]
    Encoding { part: String },

    #[error("malformed XML in '{part}': {source}")]
    Xml {
        part: String,
        #[source]
        source: roxmltree::Error,
    },

    #[error("document has no body")]
    MissingBody,
}
