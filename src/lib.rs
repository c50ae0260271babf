//! # coverpress
//!
//! Generates assignment cover pages from a live preview and, when a
//! companion file is supplied, merges them in front of it as one PDF.
//!
//! The pipeline itself lives in `coverpress-core` and is driven entirely
//! through injected capabilities. This crate re-exports the public API and
//! adds the native adapters: a [`DirectorySink`] that writes finished
//! documents to disk and an [`FsCompanion`] that reads companion files from
//! it. Browser adapters live in `coverpress-wasm`.

#[cfg(feature = "native")]
pub mod native;

pub use coverpress_core::*;
pub use coverpress_docx::{DocxError, HtmlConversion, convert_to_html, print_markup};
pub use coverpress_pdf_composer::{ParsedDocument, merge, merge_all, parse_all};
pub use coverpress_traits::{InMemoryCompanion, InMemorySink, SavedDocument};
pub use coverpress_types::{DataUri, PageLayout, StyledMarkup};

#[cfg(feature = "native")]
pub use native::{DirectorySink, FsCompanion};
