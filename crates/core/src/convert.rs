//! Word documents to pages, through the same staging and capture seams the
//! cover page uses.

use async_trait::async_trait;
use coverpress_docx::{convert_to_html, print_markup};
use coverpress_traits::{
    CaptureRequest, ConversionError, DocumentBuilder, FormatConverter, Rasterizer, StagingHost,
    StagingNode,
};
use coverpress_types::{PageDocument, PageLayout};
use log::{debug, info, warn};
use std::rc::Rc;

/// Converts `.docx` bytes into paginated pages.
///
/// The document becomes print-styled HTML, which is staged off-screen at the
/// page's reference width, captured at full height and cut into pages.
pub struct StagedDocxConverter<H, R> {
    host: Rc<H>,
    rasterizer: Rc<R>,
    builder: Rc<dyn DocumentBuilder>,
    layout: PageLayout,
    capture_scale: f32,
    allow_cross_origin: bool,
}

impl<H, R> StagedDocxConverter<H, R>
where
    H: StagingHost,
    R: Rasterizer<H::Node>,
{
    pub fn new(
        host: Rc<H>,
        rasterizer: Rc<R>,
        builder: Rc<dyn DocumentBuilder>,
        layout: PageLayout,
    ) -> Self {
        Self {
            host,
            rasterizer,
            builder,
            layout,
            capture_scale: coverpress_traits::MIN_CAPTURE_SCALE,
            allow_cross_origin: true,
        }
    }

    pub fn with_capture(mut self, scale: f32, allow_cross_origin: bool) -> Self {
        self.capture_scale = scale;
        self.allow_cross_origin = allow_cross_origin;
        self
    }
}

#[async_trait(?Send)]
impl<H, R> FormatConverter for StagedDocxConverter<H, R>
where
    H: StagingHost,
    R: Rasterizer<H::Node>,
{
    async fn convert(&self, bytes: &[u8]) -> Result<PageDocument, ConversionError> {
        let conversion =
            convert_to_html(bytes).map_err(|e| ConversionError::InvalidDocument(e.to_string()))?;
        for message in &conversion.warnings {
            warn!("Word conversion: {}", message);
        }

        // Nothing to stage: an empty container measures zero pixels high.
        if conversion.html.trim().is_empty() {
            warn!("Word document has no visible content; emitting one blank page");
            return self
                .builder
                .build_blank_page(self.layout.format)
                .map_err(|e| ConversionError::Pagination(e.to_string()));
        }

        let (width_px, _) = self.layout.format.reference_px();
        let markup = print_markup(&conversion.html, width_px);
        debug!("Staging {} bytes of converted markup", markup.html.len());

        let raster = {
            let staged = StagingNode::markup(&*self.host, &markup)
                .map_err(|e| ConversionError::Staging(e.to_string()))?;
            let request = CaptureRequest::flowing(width_px, self.capture_scale)
                .with_cross_origin(self.allow_cross_origin);
            self.rasterizer
                .capture(staged.node(), &request)
                .await
                .map_err(|e| ConversionError::Render(e.to_string()))?
        };

        let paginated = self
            .builder
            .build_paginated(&raster, &self.layout)
            .map_err(|e| ConversionError::Pagination(e.to_string()))?;
        info!("Converted Word document into {} page(s)", paginated.page_count);
        Ok(paginated.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use coverpress_render_lopdf::LopdfDocumentBuilder;
    use coverpress_traits::{CaptureError, StagingError};
    use coverpress_types::{DataUri, StyledMarkup};
    use std::cell::RefCell;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    /// Remembers staged markup and whether it is still mounted.
    #[derive(Default)]
    struct Host {
        staged: RefCell<Vec<StyledMarkup>>,
        mounted: RefCell<usize>,
    }

    impl StagingHost for Host {
        type Node = ();

        fn stage_clone(&self, id: &str, _: u32, _: u32) -> Result<(), StagingError> {
            Err(StagingError::ElementNotFound(id.to_string()))
        }

        fn stage_markup(&self, markup: &StyledMarkup) -> Result<(), StagingError> {
            self.staged.borrow_mut().push(markup.clone());
            *self.mounted.borrow_mut() += 1;
            Ok(())
        }

        fn release(&self, _: &()) {
            *self.mounted.borrow_mut() -= 1;
        }
    }

    struct Refusing;

    #[async_trait(?Send)]
    impl Rasterizer<()> for Refusing {
        async fn capture(&self, _: &(), _: &CaptureRequest) -> Result<DataUri, CaptureError> {
            Err(CaptureError::CrossOrigin("https://cdn.example/logo.png".to_string()))
        }
    }

    fn converter(host: Rc<Host>) -> StagedDocxConverter<Host, Refusing> {
        StagedDocxConverter::new(
            host,
            Rc::new(Refusing),
            Rc::new(LopdfDocumentBuilder::new()),
            PageLayout::default(),
        )
    }

    #[tokio::test]
    async fn garbage_is_an_invalid_document() {
        let host = Rc::new(Host::default());
        let err = converter(host.clone()).convert(b"not a zip").await.unwrap_err();
        assert!(matches!(err, ConversionError::InvalidDocument(_)));
        assert!(host.staged.borrow().is_empty());
    }

    #[tokio::test]
    async fn capture_failure_unmounts_markup() {
        let _ = env_logger::builder().is_test(true).try_init();
        let host = Rc::new(Host::default());
        let docx = minimal_docx();

        let err = converter(host.clone()).convert(&docx).await.unwrap_err();

        assert!(matches!(err, ConversionError::Render(_)), "{err:?}");
        assert_eq!(host.staged.borrow().len(), 1);
        assert_eq!(host.staged.borrow()[0].width_px, 794);
        assert_eq!(*host.mounted.borrow(), 0);
    }

    #[tokio::test]
    async fn empty_document_becomes_one_blank_page() {
        let host = Rc::new(Host::default());
        let docx = docx_with_body("<w:p/><w:p><w:r><w:t> </w:t></w:r></w:p>");

        let document = converter(host.clone()).convert(&docx).await.unwrap();

        assert_eq!(coverpress_pdf_composer::page_count(&document).unwrap(), 1);
        assert!(host.staged.borrow().is_empty());
    }

    fn minimal_docx() -> Vec<u8> {
        docx_with_body("<w:p><w:r><w:t>Hi</w:t></w:r></w:p>")
    }

    fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }
}
