use std::fmt;
use std::sync::Arc;

/// Media type of every artifact the pipeline produces.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// An immutable, paginated document held as bytes.
///
/// Cloning is cheap and never copies the buffer. There is no way to mutate a
/// `PageDocument` once built; merging always yields a new one.
#[derive(Clone, PartialEq, Eq)]
pub struct PageDocument {
    bytes: Arc<[u8]>,
}

impl PageDocument {
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }
}

impl From<Vec<u8>> for PageDocument {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl AsRef<[u8]> for PageDocument {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for PageDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageDocument")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The declared kind of an uploaded companion file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompanionKind {
    Pdf,
    WordDocument,
}

impl CompanionKind {
    /// Infers the kind from a file name suffix, case-insensitively.
    ///
    /// `.doc` and `.docx` are word-processing documents. Everything else,
    /// including names without an extension, is treated as PDF.
    pub fn from_file_name(name: &str) -> Self {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "doc" | "docx" => CompanionKind::WordDocument,
            _ => CompanionKind::Pdf,
        }
    }
}

/// Formats a byte count as mebibytes with two decimals ("1.50").
pub fn friendly_size_mb(size_bytes: u64) -> String {
    format!("{:.2}", size_bytes as f64 / 1024.0 / 1024.0)
}
