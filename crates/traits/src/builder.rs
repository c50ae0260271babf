use coverpress_types::{DataUri, PageDocument, PageFormat, PageLayout};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("unsupported image type: {0}")]
    UnsupportedImage(String),

    #[error("image could not be decoded: {0}")]
    InvalidImage(String),

    #[error("document could not be written: {0}")]
    Pdf(String),
}

/// A document produced from one tall raster, with its page count.
#[derive(Debug, Clone)]
pub struct PaginatedDocument {
    pub document: PageDocument,
    pub page_count: usize,
}

/// Wraps bitmaps into paginated documents.
pub trait DocumentBuilder {
    /// One page of `format`, with `image` stretched to fill it exactly.
    fn build_single_page(
        &self,
        image: &DataUri,
        format: PageFormat,
    ) -> Result<PageDocument, BuildError>;

    /// One empty page of `format`, for sources with nothing to draw.
    fn build_blank_page(&self, format: PageFormat) -> Result<PageDocument, BuildError>;

    /// Cuts a full-height raster of flowing content into as many pages of
    /// `layout` as it needs, preferring blank bands for the cuts.
    fn build_paginated(
        &self,
        image: &DataUri,
        layout: &PageLayout,
    ) -> Result<PaginatedDocument, BuildError>;
}
