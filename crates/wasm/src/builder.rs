//! CoverPress builder for WASM.
//!
//! This module provides the main entry point for document generation in JavaScript.

use crate::error::JsPipelineError;
use crate::rasterizer::Html2CanvasRasterizer;
use crate::sink::DownloadSink;
use crate::source::WebFile;
use crate::staging::DomStagingHost;
use coverpress_core::{CompanionSource, CoverRecord, PipelineBuilder, PipelineConfig, ProgressEvent};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

/// The main entry point for cover page generation in JavaScript.
///
/// # Example
///
/// ```javascript
/// const press = new CoverPress().withConfig({ pageFormat: 'A4' });
/// const { fileName, pageCount } = await press.generateDocument(
///   'cover-preview', formState, file, onProgress);
/// ```
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct CoverPress {
    config: PipelineConfig,
    capture_global: Option<String>,
}

#[wasm_bindgen]
impl CoverPress {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        // Panic hook is set in lib.rs init()
        Self::default()
    }

    /// Replace the configuration with a (possibly partial) config object.
    ///
    /// Missing fields keep their defaults.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(mut self, config: JsValue) -> Result<CoverPress, JsValue> {
        self.config = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsPipelineError::config(format!("Invalid config: {}", e)))?;
        Ok(self)
    }

    /// Use a capture function published under a global other than `html2canvas`.
    #[wasm_bindgen(js_name = withCaptureGlobal)]
    pub fn with_capture_global(mut self, name: String) -> Self {
        self.capture_global = Some(name);
        self
    }

    /// The file name a record would be saved under.
    #[wasm_bindgen(js_name = fileNameFor)]
    pub fn file_name_for(&self, record: JsValue) -> Result<String, JsValue> {
        let record = parse_record(record)?;
        Ok(coverpress_core::derive_file_name(
            &record,
            &self.config.file_naming,
        ))
    }

    /// Generate the cover page, merge the optional companion file behind it
    /// and trigger a download.
    ///
    /// # Arguments
    ///
    /// * `source_element_id` - Id of the live preview element to capture
    /// * `record` - The cover form fields
    /// * `companion` - An optional `.pdf` or `.docx` file
    /// * `on_progress` - Called with `{ message, percentage }` at each stage
    ///
    /// # Returns
    ///
    /// A Promise resolving to `{ fileName, pageCount }` once the download
    /// has been triggered. It rejects with an `Error` whose `code` is one of
    /// `CAPTURE_ERROR`, `CONVERSION_ERROR`, `MERGE_ERROR` or `PIPELINE_ERROR`.
    #[wasm_bindgen(js_name = generateDocument)]
    pub fn generate_document(
        &self,
        source_element_id: String,
        record: JsValue,
        companion: Option<web_sys::File>,
        on_progress: Option<js_sys::Function>,
    ) -> js_sys::Promise {
        let config = self.config.clone();
        let rasterizer = match &self.capture_global {
            Some(name) => Html2CanvasRasterizer::with_global(name.clone()),
            None => Html2CanvasRasterizer::new(),
        };

        future_to_promise(async move {
            let record = parse_record(record)?;
            let host = DomStagingHost::current()
                .ok_or_else(|| JsPipelineError::config("No document available"))?;
            let pipeline = PipelineBuilder::new(host, rasterizer)
                .with_config(config)
                .with_sink(Rc::new(DownloadSink::new()))
                .build()
                .map_err(JsPipelineError::from)?;

            let companion = companion.map(WebFile::new);
            let report = pipeline
                .generate(
                    &source_element_id,
                    &record,
                    companion.as_ref().map(|c| c as &dyn CompanionSource),
                    |event| notify(on_progress.as_ref(), &event),
                )
                .await
                .map_err(JsPipelineError::from)?;

            serde_wasm_bindgen::to_value(&report)
                .map_err(|e| JsPipelineError::config(format!("Cannot return report: {}", e)).into())
        })
    }
}

fn parse_record(record: JsValue) -> Result<CoverRecord, JsPipelineError> {
    serde_wasm_bindgen::from_value(record)
        .map_err(|e| JsPipelineError::config(format!("Invalid cover record: {}", e)))
}

/// Forwards one event to the JS callback. Callback exceptions are logged, not propagated.
fn notify(callback: Option<&js_sys::Function>, event: &ProgressEvent) {
    let Some(callback) = callback else {
        return;
    };
    let result = serde_wasm_bindgen::to_value(event)
        .map_err(JsValue::from)
        .and_then(|value| callback.call1(&JsValue::NULL, &value));
    if let Err(e) = result {
        log::warn!("Progress callback failed: {}", crate::error::describe(&e));
    }
}
