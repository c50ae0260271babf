//! Save finished documents as browser downloads.

use async_trait::async_trait;
use coverpress_traits::{DocumentSink, SaveError};
use coverpress_types::PageDocument;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Triggers a download through a temporary object URL and anchor element.
#[derive(Debug, Clone, Copy, Default)]
pub struct DownloadSink;

impl DownloadSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl DocumentSink for DownloadSink {
    async fn save(
        &self,
        file_name: &str,
        media_type: &str,
        document: &PageDocument,
    ) -> Result<(), SaveError> {
        let failed = |message: String| SaveError::Failed {
            file_name: file_name.to_string(),
            message,
        };
        let doc = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| failed("no document available".to_string()))?;
        let body = doc
            .body()
            .ok_or_else(|| failed("document has no <body>".to_string()))?;

        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(document.as_bytes()));
        let properties = BlobPropertyBag::new();
        properties.set_type(media_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &properties)
            .map_err(|e| failed(format!("{:?}", e)))?;
        let url = Url::create_object_url_with_blob(&blob).map_err(|e| failed(format!("{:?}", e)))?;

        let link: HtmlAnchorElement = doc
            .create_element("a")
            .map_err(|e| failed(format!("{:?}", e)))?
            .dyn_into()
            .map_err(|_| failed("<a> is not an anchor element".to_string()))?;
        link.set_href(&url);
        link.set_download(file_name);
        let appended = body.append_child(&link);
        if appended.is_ok() {
            link.click();
            link.remove();
        }
        Url::revoke_object_url(&url).ok();
        appended.map_err(|e| failed(format!("{:?}", e)))?;
        log::info!("Download of '{}' triggered ({} bytes)", file_name, document.len());
        Ok(())
    }
}
