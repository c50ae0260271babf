//! The document assembly pipeline and its builder.

use crate::config::PipelineConfig;
use crate::convert::StagedDocxConverter;
use crate::error::PipelineError;
use crate::filename::derive_file_name;
use crate::stage::{Stage, StageTracker};
use coverpress_pdf_composer as composer;
use coverpress_render_lopdf::LopdfDocumentBuilder;
use coverpress_traits::{
    CaptureError, CaptureRequest, CompanionSource, DocumentBuilder, DocumentSink,
    FormatConverter, Rasterizer, StagingHost, StagingNode,
};
use coverpress_types::{
    CompanionKind, CoverRecord, PDF_MEDIA_TYPE, PageDocument, ProgressEvent, friendly_size_mb,
};
use log::info;
use serde::Serialize;
use std::rc::Rc;

/// What a successful invocation produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub file_name: String,
    pub page_count: usize,
}

/// A builder for creating a [`CoverPipeline`].
pub struct PipelineBuilder<H, R> {
    host: Rc<H>,
    rasterizer: Rc<R>,
    config: PipelineConfig,
    builder: Option<Rc<dyn DocumentBuilder>>,
    converter: Option<Rc<dyn FormatConverter>>,
    sink: Option<Rc<dyn DocumentSink>>,
}

impl<H, R> PipelineBuilder<H, R>
where
    H: StagingHost + 'static,
    R: Rasterizer<H::Node> + 'static,
{
    /// Starts a builder around the two capabilities every invocation needs:
    /// somewhere to stage nodes and something to capture them.
    pub fn new(host: H, rasterizer: R) -> Self {
        Self::from_shared(Rc::new(host), Rc::new(rasterizer))
    }

    pub fn from_shared(host: Rc<H>, rasterizer: Rc<R>) -> Self {
        Self {
            host,
            rasterizer,
            config: PipelineConfig::default(),
            builder: None,
            converter: None,
            sink: None,
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the default lopdf page builder.
    pub fn with_document_builder(mut self, builder: Rc<dyn DocumentBuilder>) -> Self {
        self.builder = Some(builder);
        self
    }

    /// Replaces the default Word converter, which stages print-styled HTML
    /// on the same host and captures it with the same rasterizer.
    pub fn with_converter(mut self, converter: Rc<dyn FormatConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Where finished documents go. Required.
    pub fn with_sink(mut self, sink: Rc<dyn DocumentSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<CoverPipeline<H, R>, PipelineError> {
        let sink = self.sink.ok_or_else(|| {
            PipelineError::Other("No document sink has been configured. Use `with_sink`.".to_string())
        })?;
        let builder: Rc<dyn DocumentBuilder> = self
            .builder
            .unwrap_or_else(|| Rc::new(LopdfDocumentBuilder::new()));
        let converter: Rc<dyn FormatConverter> = match self.converter {
            Some(converter) => converter,
            None => Rc::new(
                StagedDocxConverter::new(
                    self.host.clone(),
                    self.rasterizer.clone(),
                    builder.clone(),
                    self.config.conversion_layout(),
                )
                .with_capture(
                    self.config.effective_capture_scale(),
                    self.config.allow_cross_origin,
                ),
            ),
        };

        Ok(CoverPipeline {
            host: self.host,
            rasterizer: self.rasterizer,
            builder,
            converter,
            sink,
            config: self.config,
        })
    }
}

/// Stages a live cover preview, captures it, and saves it as a one-page
/// document or merged in front of a companion file.
///
/// One invocation runs at a time; callers must not start another while one
/// is in flight.
pub struct CoverPipeline<H, R> {
    host: Rc<H>,
    rasterizer: Rc<R>,
    builder: Rc<dyn DocumentBuilder>,
    converter: Rc<dyn FormatConverter>,
    sink: Rc<dyn DocumentSink>,
    config: PipelineConfig,
}

impl<H, R> CoverPipeline<H, R>
where
    H: StagingHost,
    R: Rasterizer<H::Node>,
{
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs one invocation.
    ///
    /// `on_progress` receives every stage transition synchronously. On
    /// failure nothing is saved, and every staged node has been released by
    /// the time the error is returned.
    pub async fn generate<F>(
        &self,
        source_id: &str,
        record: &CoverRecord,
        companion: Option<&dyn CompanionSource>,
        on_progress: F,
    ) -> Result<GenerationReport, PipelineError>
    where
        F: FnMut(ProgressEvent),
    {
        let mut tracker = StageTracker::new(on_progress);
        let result = self.run(&mut tracker, source_id, record, companion).await;
        if let Err(e) = &result {
            tracker.fail(e);
        }
        result
    }

    async fn run<F: FnMut(ProgressEvent)>(
        &self,
        tracker: &mut StageTracker<F>,
        source_id: &str,
        record: &CoverRecord,
        companion: Option<&dyn CompanionSource>,
    ) -> Result<GenerationReport, PipelineError> {
        tracker.enter(Stage::Staging)?;
        tracker.report("Initializing...", 0);
        let (width_px, height_px) = self.config.page_format.reference_px();
        tracker.report("Preparing preview...", 10);
        let staged = StagingNode::clone_of(&*self.host, source_id, width_px, height_px)
            .map_err(CaptureError::from)?;

        tracker.enter(Stage::Capturing)?;
        tracker.report("Rendering cover page image...", 25);
        let request = CaptureRequest::page(width_px, height_px, self.config.effective_capture_scale())
            .with_cross_origin(self.config.allow_cross_origin);
        let image = self.rasterizer.capture(staged.node(), &request).await?;

        tracker.enter(Stage::BuildingCover)?;
        tracker.report("Creating cover page...", 40);
        let cover = self
            .builder
            .build_single_page(&image, self.config.page_format)?;
        let file_name = derive_file_name(record, &self.config.file_naming);

        let Some(companion) = companion else {
            tracker.enter(Stage::Direct)?;
            tracker.report("Saving cover page...", 90);
            self.sink.save(&file_name, PDF_MEDIA_TYPE, &cover).await?;
            tracker.enter(Stage::Done)?;
            tracker.report("Done! Cover page is downloading.", 100);
            info!("Saved cover page as '{}'", file_name);
            return Ok(GenerationReport {
                file_name,
                page_count: 1,
            });
        };

        tracker.enter(Stage::CompanionLoad)?;
        let size = friendly_size_mb(companion.size());
        let companion_doc = match CompanionKind::from_file_name(companion.name()) {
            CompanionKind::Pdf => {
                tracker.report(format!("Loading assignment file ({} MB)...", size), 50);
                PageDocument::from(companion.read().await?)
            }
            CompanionKind::WordDocument => {
                tracker.report(format!("Converting Word document ({} MB)...", size), 50);
                let bytes = companion.read().await?;
                tracker.enter(Stage::Converting)?;
                self.converter.convert(&bytes).await?
            }
        };

        tracker.enter(Stage::Parsing)?;
        tracker.report("Parsing documents...", 60);
        let parsed = composer::parse_all(&[cover, companion_doc])?;
        let companion_pages: usize = parsed.iter().skip(1).map(|p| p.page_count()).sum();

        tracker.enter(Stage::Merging)?;
        tracker.report(format!("Merging {} page(s)...", companion_pages), 75);
        let merged = composer::merge(&parsed)?;
        let page_count = parsed.iter().map(|p| p.page_count()).sum();

        tracker.enter(Stage::Saving)?;
        tracker.report("Saving final document...", 90);
        tracker.report("Finalizing download...", 99);
        self.sink.save(&file_name, PDF_MEDIA_TYPE, &merged).await?;

        tracker.enter(Stage::Done)?;
        tracker.report("Done! Merged document is downloading.", 100);
        info!("Saved {} page(s) as '{}'", page_count, file_name);
        drop(staged);
        Ok(GenerationReport {
            file_name,
            page_count,
        })
    }
}
