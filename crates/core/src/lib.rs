//! # coverpress-core
//!
//! Platform-agnostic document assembly: stage a cover preview, capture it,
//! wrap it into a page, optionally convert and merge a companion document,
//! and hand the result to a sink.
//!
//! ## Design Principle
//!
//! This crate has **no platform dependencies**. The DOM, the capture engine,
//! file reading and saving are all capabilities injected through the traits
//! in `coverpress-traits`, so the same pipeline drives a browser download or
//! a test with in-memory mocks.

// Re-export foundation crates
pub use coverpress_traits as traits;
pub use coverpress_types as types;

pub mod config;
pub mod convert;
pub mod error;
pub mod filename;
pub mod pipeline;
pub mod stage;

pub use config::{FileNameConfig, PipelineConfig};
pub use convert::StagedDocxConverter;
pub use error::{ErrorKind, PipelineError};
pub use filename::derive_file_name;
pub use pipeline::{CoverPipeline, GenerationReport, PipelineBuilder};
pub use stage::{Stage, StageTracker};

pub use coverpress_pdf_composer::MergeError;
pub use coverpress_render_lopdf::LopdfDocumentBuilder;
pub use coverpress_traits::{
    BuildError, CONVERSION_USER_MESSAGE, CaptureError, CaptureRequest, CompanionSource,
    ConversionError, DocumentBuilder, DocumentSink, FormatConverter, Rasterizer, SaveError,
    SourceError, StagingError, StagingHost, StagingNode,
};
pub use coverpress_types::{
    CompanionKind, CoverRecord, GroupMember, PageDocument, PageFormat, ProgressEvent,
};
