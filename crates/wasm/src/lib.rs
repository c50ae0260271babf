//! WebAssembly bindings for coverpress.
//!
//! This crate wires the platform-agnostic pipeline in `coverpress-core` to
//! the browser: the live DOM is the staging surface, the page's global
//! `html2canvas` is the rasterizer, a `File` from an `<input>` is the
//! companion source and a Blob download is the save target.
//!
//! ## Module Structure
//!
//! - [`builder`] - `CoverPress` builder and the `generateDocument` entry point
//! - [`staging`] - Off-screen clones and print markup in the live DOM
//! - [`rasterizer`] - Capture through `html2canvas`
//! - [`sink`] - Blob downloads
//! - [`source`] - `File` handles as companion sources
//! - [`error`] - Error types with JavaScript interop
//!
//! # Example
//!
//! ```javascript
//! import init, { CoverPress } from '@coverpress/wasm';
//!
//! await init();
//!
//! const press = new CoverPress().withConfig({ captureScale: 3 });
//! const report = await press.generateDocument(
//!   'cover-preview',
//!   formState,
//!   fileInput.files[0] ?? null,
//!   ({ message, percentage }) => setProgress(message, percentage),
//! );
//! ```
//!
//! # Browser Support
//!
//! Requires `html2canvas` to be loaded as a global before the first call.

mod builder;
mod error;
mod rasterizer;
mod sink;
mod source;
mod staging;

pub use builder::CoverPress;
pub use error::JsPipelineError;
pub use rasterizer::Html2CanvasRasterizer;
pub use sink::DownloadSink;
pub use source::WebFile;
pub use staging::{DomStagingHost, StagedElement};

use wasm_bindgen::prelude::*;

/// Initialize the WASM module.
///
/// Sets up panic hooks for better error messages in the browser console.
/// It is called automatically when using wasm-pack's generated JavaScript.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(feature = "console-logging")]
    {
        console_log::init_with_level(log::Level::Debug).ok();
    }
}

/// Get the version of the coverpress-wasm library.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
