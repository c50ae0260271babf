pub mod fixtures;
pub mod pdf_assertions;

use async_trait::async_trait;
use coverpress::{
    CaptureError, CaptureRequest, CompanionSource, CoverPipeline, CoverRecord, DataUri,
    InMemorySink, PipelineBuilder, PipelineConfig, PipelineError, ProgressEvent, Rasterizer,
    StagingError, StagingHost, StyledMarkup,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lopdf::Document as LopdfDocument;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io::Cursor;
use std::rc::Rc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Id of the live preview element every mock document starts with.
pub const PREVIEW_ID: &str = "cover-preview";

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }
}

/// What a mock node was mounted from.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Clone { source_id: String },
    Markup { root_class: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MountedNode {
    pub id: u32,
    pub kind: NodeKind,
    pub width_px: u32,
    pub height_px: Option<u32>,
}

/// An in-memory document tree: a set of live element ids plus whatever is
/// currently staged.
#[derive(Debug, Default)]
pub struct MockDom {
    live: RefCell<HashSet<String>>,
    mounted: RefCell<Vec<MountedNode>>,
    staged_markup: RefCell<Vec<StyledMarkup>>,
    next_id: Cell<u32>,
}

impl MockDom {
    pub fn with_elements(ids: &[&str]) -> Rc<Self> {
        let dom = Self::default();
        dom.live
            .borrow_mut()
            .extend(ids.iter().map(|id| id.to_string()));
        Rc::new(dom)
    }

    pub fn mounted(&self) -> Vec<MountedNode> {
        self.mounted.borrow().clone()
    }

    pub fn is_mounted(&self, id: u32) -> bool {
        self.mounted.borrow().iter().any(|n| n.id == id)
    }

    /// Every markup ever staged, in order.
    pub fn staged_markup(&self) -> Vec<StyledMarkup> {
        self.staged_markup.borrow().clone()
    }

    fn mount(&self, kind: NodeKind, width_px: u32, height_px: Option<u32>) -> MountedNode {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let node = MountedNode {
            id,
            kind,
            width_px,
            height_px,
        };
        self.mounted.borrow_mut().push(node.clone());
        node
    }
}

impl StagingHost for MockDom {
    type Node = MountedNode;

    fn stage_clone(
        &self,
        source_id: &str,
        width_px: u32,
        height_px: u32,
    ) -> Result<MountedNode, StagingError> {
        if !self.live.borrow().contains(source_id) {
            return Err(StagingError::ElementNotFound(source_id.to_string()));
        }
        Ok(self.mount(
            NodeKind::Clone {
                source_id: source_id.to_string(),
            },
            width_px,
            Some(height_px),
        ))
    }

    fn stage_markup(&self, markup: &StyledMarkup) -> Result<MountedNode, StagingError> {
        self.staged_markup.borrow_mut().push(markup.clone());
        Ok(self.mount(
            NodeKind::Markup {
                root_class: markup.root_class.clone(),
            },
            markup.width_px,
            None,
        ))
    }

    fn release(&self, node: &MountedNode) {
        self.mounted.borrow_mut().retain(|n| n.id != node.id);
    }
}

/// Which captures the mock rasterizer refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Nothing,
    Page,
    Flowing,
}

/// Produces real PNG data URIs at reference size (scale is recorded, not applied).
pub struct MockRasterizer {
    dom: Rc<MockDom>,
    fail_on: Cell<FailOn>,
    flowing_height: Cell<u32>,
    requests: RefCell<Vec<CaptureRequest>>,
}

impl MockRasterizer {
    pub fn new(dom: Rc<MockDom>) -> Rc<Self> {
        Rc::new(Self {
            dom,
            fail_on: Cell::new(FailOn::Nothing),
            flowing_height: Cell::new(2500),
            requests: RefCell::new(Vec::new()),
        })
    }

    pub fn fail_on(&self, fail_on: FailOn) {
        self.fail_on.set(fail_on);
    }

    /// Rendered height of flowing content, in reference pixels.
    pub fn set_flowing_height(&self, height: u32) {
        self.flowing_height.set(height);
    }

    pub fn requests(&self) -> Vec<CaptureRequest> {
        self.requests.borrow().clone()
    }
}

/// A light page with a dark block, as a filled-in cover would look.
pub fn cover_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if x > width / 4 && x < width * 3 / 4 && y > height / 4 && y < height / 3 {
            Rgb([20, 20, 60])
        } else {
            Rgb([250, 250, 250])
        }
    })
}

/// Text-like content: ten dark rows followed by ten blank rows, repeated.
pub fn banded_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |_, y| {
        if y % 20 < 10 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    })
}

pub fn png_data_uri(image: RgbImage) -> DataUri {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    DataUri::png(bytes)
}

#[async_trait(?Send)]
impl Rasterizer<MountedNode> for MockRasterizer {
    async fn capture(
        &self,
        node: &MountedNode,
        request: &CaptureRequest,
    ) -> Result<DataUri, CaptureError> {
        self.requests.borrow_mut().push(*request);
        if !self.dom.is_mounted(node.id) {
            return Err(CaptureError::Unmeasurable("node is detached".to_string()));
        }
        let fail_on = self.fail_on.get();
        match request.height_px {
            Some(height) => {
                if fail_on == FailOn::Page {
                    return Err(CaptureError::Render("forced page failure".to_string()));
                }
                Ok(png_data_uri(cover_image(request.width_px, height)))
            }
            None => {
                if fail_on == FailOn::Flowing {
                    return Err(CaptureError::Render("forced flowing failure".to_string()));
                }
                Ok(png_data_uri(banded_image(
                    request.width_px,
                    self.flowing_height.get(),
                )))
            }
        }
    }
}

/// A pipeline wired to mocks, with handles on every mock for assertions.
pub struct Harness {
    pub dom: Rc<MockDom>,
    pub rasterizer: Rc<MockRasterizer>,
    pub sink: Rc<InMemorySink>,
    pub pipeline: CoverPipeline<MockDom, MockRasterizer>,
}

pub fn harness() -> Harness {
    harness_with(PipelineConfig::default())
}

pub fn harness_with(config: PipelineConfig) -> Harness {
    let dom = MockDom::with_elements(&[PREVIEW_ID]);
    let rasterizer = MockRasterizer::new(dom.clone());
    let sink = Rc::new(InMemorySink::new());
    let pipeline = PipelineBuilder::from_shared(dom.clone(), rasterizer.clone())
        .with_config(config)
        .with_sink(sink.clone())
        .build()
        .unwrap();
    Harness {
        dom,
        rasterizer,
        sink,
        pipeline,
    }
}

impl Harness {
    /// Runs one invocation against the preview element and collects its progress events.
    pub async fn run(
        &self,
        record: &CoverRecord,
        companion: Option<&dyn CompanionSource>,
    ) -> (Result<coverpress::GenerationReport, PipelineError>, Vec<ProgressEvent>) {
        let mut events = Vec::new();
        let result = self
            .pipeline
            .generate(PREVIEW_ID, record, companion, |e| events.push(e))
            .await;
        (result, events)
    }

    /// The single document the sink received, parsed.
    pub fn saved_pdf(&self) -> GeneratedPdf {
        let saved = self.sink.saved();
        assert_eq!(saved.len(), 1, "expected exactly one saved document");
        GeneratedPdf::from_bytes(saved[0].document.to_vec()).unwrap()
    }
}
