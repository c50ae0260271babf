//! Error handling for WASM bindings.
//!
//! Converts pipeline errors into JavaScript `Error` objects carrying a
//! machine-readable `code` and a `userMessage` fit for display.

use coverpress_core::{ErrorKind, PipelineError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// A JavaScript-friendly error.
///
/// Not a wasm_bindgen struct: it converts into a plain JS `Error` instead.
#[derive(Debug)]
pub struct JsPipelineError {
    code: &'static str,
    message: String,
    user_message: String,
}

impl JsPipelineError {
    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    /// An error raised by the bindings themselves (bad arguments, missing globals).
    pub fn config(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: ErrorKind::Pipeline.code(),
            user_message: message.clone(),
            message,
        }
    }
}

impl From<PipelineError> for JsPipelineError {
    fn from(err: PipelineError) -> Self {
        Self {
            code: err.kind().code(),
            message: err.to_string(),
            user_message: err.user_message(),
        }
    }
}

impl From<JsPipelineError> for JsValue {
    fn from(err: JsPipelineError) -> Self {
        let js_error = js_sys::Error::new(&err.message);

        js_sys::Reflect::set(&js_error, &"code".into(), &JsValue::from_str(err.code)).ok();
        js_sys::Reflect::set(
            &js_error,
            &"userMessage".into(),
            &JsValue::from_str(&err.user_message),
        )
        .ok();

        js_error.into()
    }
}

/// Best-effort text for an exception thrown by JavaScript.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
