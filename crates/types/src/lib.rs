//! Foundation types shared by every coverpress crate.
//!
//! Nothing in here performs I/O. The record, page geometry and document
//! buffers are plain values that flow between the capability traits in
//! `coverpress-traits` and the orchestrator in `coverpress-core`.

pub mod document;
pub mod image;
pub mod markup;
pub mod page;
pub mod progress;
pub mod record;

pub use document::{CompanionKind, PDF_MEDIA_TYPE, PageDocument, friendly_size_mb};
pub use image::{DataUri, DataUriError};
pub use markup::StyledMarkup;
pub use page::{PageFormat, PageLayout, REFERENCE_DPI};
pub use progress::ProgressEvent;
pub use record::{CoverRecord, GroupMember};
