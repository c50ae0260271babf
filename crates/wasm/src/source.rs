use async_trait::async_trait;
use coverpress_traits::{CompanionSource, SourceError};
use wasm_bindgen_futures::JsFuture;

/// A `File` picked by the user, read once when the pipeline asks for it.
#[derive(Debug, Clone)]
pub struct WebFile {
    file: web_sys::File,
    name: String,
}

impl WebFile {
    pub fn new(file: web_sys::File) -> Self {
        let name = file.name();
        Self { file, name }
    }
}

#[async_trait(?Send)]
impl CompanionSource for WebFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.file.size().max(0.0) as u64
    }

    async fn read(&self) -> Result<Vec<u8>, SourceError> {
        let buffer = JsFuture::from(self.file.array_buffer())
            .await
            .map_err(|e| SourceError::ReadFailed {
                name: self.name.clone(),
                message: crate::error::describe(&e),
            })?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}
