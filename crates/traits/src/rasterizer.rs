use crate::staging::StagingError;
use async_trait::async_trait;
use coverpress_types::DataUri;
use thiserror::Error;

/// Smallest oversampling factor that still yields print-quality output.
pub const MIN_CAPTURE_SCALE: f32 = 3.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("element not found: '{0}'")]
    ElementNotFound(String),

    #[error("node cannot be measured: {0}")]
    Unmeasurable(String),

    #[error("blocked cross-origin resource: {0}")]
    CrossOrigin(String),

    #[error("rendering failed: {0}")]
    Render(String),
}

impl From<StagingError> for CaptureError {
    fn from(err: StagingError) -> Self {
        match err {
            StagingError::ElementNotFound(id) => CaptureError::ElementNotFound(id),
            StagingError::Mount(msg) => CaptureError::Unmeasurable(msg),
        }
    }
}

/// Parameters for one capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureRequest {
    pub width_px: u32,
    /// `None` captures the node's full rendered height.
    pub height_px: Option<u32>,
    pub scale: f32,
    pub allow_cross_origin: bool,
}

impl CaptureRequest {
    /// A fixed-size capture of a page-sized node.
    pub fn page(width_px: u32, height_px: u32, scale: f32) -> Self {
        Self {
            width_px,
            height_px: Some(height_px),
            scale: scale.max(MIN_CAPTURE_SCALE),
            allow_cross_origin: true,
        }
    }

    /// A capture of flowing content at a fixed width and whatever height it renders to.
    pub fn flowing(width_px: u32, scale: f32) -> Self {
        Self {
            width_px,
            height_px: None,
            scale: scale.max(MIN_CAPTURE_SCALE),
            allow_cross_origin: true,
        }
    }

    pub fn with_cross_origin(mut self, allow: bool) -> Self {
        self.allow_cross_origin = allow;
        self
    }
}

/// Turns a staged node into a bitmap.
///
/// Capture failures are terminal; callers never retry.
#[async_trait(?Send)]
pub trait Rasterizer<N> {
    /// Renders `node` and returns the bitmap as an image data URI.
    async fn capture(&self, node: &N, request: &CaptureRequest) -> Result<DataUri, CaptureError>;
}
