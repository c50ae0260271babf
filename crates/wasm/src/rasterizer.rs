//! Capture through the page's global `html2canvas`.

use crate::error::describe;
use crate::staging::StagedElement;
use async_trait::async_trait;
use coverpress_traits::{CaptureError, CaptureRequest, Rasterizer};
use coverpress_types::DataUri;
use js_sys::{Function, Object, Promise, Reflect};
use log::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlCanvasElement;

/// Calls `html2canvas(element, options)` and reads the canvas back as PNG.
#[derive(Debug, Clone)]
pub struct Html2CanvasRasterizer {
    global_name: String,
}

impl Html2CanvasRasterizer {
    pub fn new() -> Self {
        Self::with_global("html2canvas")
    }

    /// Uses a capture function registered under a different global name.
    pub fn with_global(name: impl Into<String>) -> Self {
        Self {
            global_name: name.into(),
        }
    }

    fn capture_fn(&self) -> Result<Function, CaptureError> {
        Reflect::get(&js_sys::global(), &JsValue::from_str(&self.global_name))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| {
                CaptureError::Render(format!("'{}' is not loaded on this page", self.global_name))
            })
    }
}

impl Default for Html2CanvasRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

fn options(request: &CaptureRequest, height_px: u32) -> Result<Object, CaptureError> {
    let options = Object::new();
    let entries: [(&str, JsValue); 7] = [
        ("scale", JsValue::from_f64(f64::from(request.scale))),
        ("useCORS", JsValue::from_bool(request.allow_cross_origin)),
        ("width", JsValue::from_f64(f64::from(request.width_px))),
        ("height", JsValue::from_f64(f64::from(height_px))),
        ("windowWidth", JsValue::from_f64(f64::from(request.width_px))),
        ("windowHeight", JsValue::from_f64(f64::from(height_px))),
        ("logging", JsValue::FALSE),
    ];
    for (key, value) in entries {
        Reflect::set(&options, &JsValue::from_str(key), &value)
            .map_err(|e| CaptureError::Render(describe(&e)))?;
    }
    Ok(options)
}

/// html2canvas reports blocked images as a tainted canvas.
fn classify(error: &JsValue) -> CaptureError {
    let message = describe(error);
    let lower = message.to_ascii_lowercase();
    if lower.contains("tainted") || lower.contains("cross-origin") || lower.contains("securityerror") {
        CaptureError::CrossOrigin(message)
    } else {
        CaptureError::Render(message)
    }
}

#[async_trait(?Send)]
impl Rasterizer<StagedElement> for Html2CanvasRasterizer {
    async fn capture(
        &self,
        node: &StagedElement,
        request: &CaptureRequest,
    ) -> Result<DataUri, CaptureError> {
        let element = node.element();
        if !element.is_connected() {
            return Err(CaptureError::Unmeasurable(
                "node was removed from the document".to_string(),
            ));
        }
        let height_px = match request.height_px {
            Some(h) => h,
            None => u32::try_from(element.scroll_height()).unwrap_or(0),
        };
        if request.width_px == 0 || height_px == 0 {
            return Err(CaptureError::Unmeasurable(format!(
                "node measures {}x{}px",
                request.width_px, height_px
            )));
        }

        debug!(
            "Capturing {}x{}px at {}x via {}",
            request.width_px, height_px, request.scale, self.global_name
        );
        let capture = self.capture_fn()?;
        let options: Object = options(request, height_px)?;
        let promise: Promise = capture
            .call2(&JsValue::NULL, element, &options)
            .map_err(|e| classify(&e))?
            .dyn_into()
            .map_err(|_| CaptureError::Render("capture did not return a promise".to_string()))?;
        let canvas: HtmlCanvasElement = JsFuture::from(promise)
            .await
            .map_err(|e| classify(&e))?
            .dyn_into()
            .map_err(|_| CaptureError::Render("capture did not produce a canvas".to_string()))?;

        let uri = canvas
            .to_data_url_with_type("image/png")
            .map_err(|e| classify(&e))?;
        DataUri::parse(&uri).map_err(|e| CaptureError::Render(e.to_string()))
    }
}
