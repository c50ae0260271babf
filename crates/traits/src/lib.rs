//! Capability seams of the document assembly pipeline.
//!
//! Each trait is a narrow contract over one engine the orchestrator drives:
//! the staging surface (a DOM in browsers), the rasterizer, the document
//! builder, the foreign-format converter, the companion file source and the
//! final save target. Implementations live in `coverpress-wasm` (browser),
//! `coverpress-render-lopdf` (builder), `coverpress-core` (converter) and the
//! root crate (native adapters); tests substitute in-memory doubles.

pub mod builder;
pub mod converter;
pub mod rasterizer;
pub mod sink;
pub mod source;
pub mod staging;

pub use builder::{BuildError, DocumentBuilder, PaginatedDocument};
pub use converter::{CONVERSION_USER_MESSAGE, ConversionError, FormatConverter};
pub use rasterizer::{CaptureError, CaptureRequest, MIN_CAPTURE_SCALE, Rasterizer};
pub use sink::{DocumentSink, InMemorySink, SaveError, SavedDocument};
pub use source::{CompanionSource, InMemoryCompanion, SourceError};
pub use staging::{StagingError, StagingHost, StagingNode};
