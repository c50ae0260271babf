use crate::xobject::ImageXObject;
use coverpress_traits::BuildError;
use coverpress_types::PageDocument;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

const PRODUCER: &str = "coverpress";

/// Where an image lands on its page, in PDF points from the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Accumulates image-only pages and writes them out as one document.
///
/// Object ids are allocated in call order and no timestamps are written, so
/// the same sequence of calls always produces the same bytes.
pub(crate) struct PageTreeWriter {
    document: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl PageTreeWriter {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    pub fn add_image_page(
        &mut self,
        image: ImageXObject,
        page_size_pt: (f32, f32),
        placement: Placement,
    ) -> Result<ObjectId, BuildError> {
        let (page_width, page_height) = page_size_pt;
        let image_id = self.document.add_object(image.stream);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        placement.width.into(),
                        0.into(),
                        0.into(),
                        placement.height.into(),
                        placement.x.into(),
                        placement.y.into(),
                    ],
                ),
                Operation::new("Do", vec!["Im0".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content
            .encode()
            .map_err(|e| BuildError::Pdf(e.to_string()))?;
        let content_id = self
            .document
            .add_object(Stream::new(dictionary! {}, encoded));

        let resources_id = self.document.add_object(dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        });

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        self.page_ids.push(page_id);
        Ok(page_id)
    }

    pub fn add_blank_page(&mut self, page_size_pt: (f32, f32)) -> ObjectId {
        let (page_width, page_height) = page_size_pt;
        let content_id = self
            .document
            .add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {},
        });
        self.page_ids.push(page_id);
        page_id
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn finish(mut self) -> Result<PageDocument, BuildError> {
        if self.page_ids.is_empty() {
            return Err(BuildError::Pdf("document has no pages".to_string()));
        }

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.document.add_object(dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
        });
        self.document.trailer.set("Root", catalog_id);
        self.document.trailer.set("Info", info_id);

        let mut buffer = Vec::new();
        self.document
            .save_to(&mut buffer)
            .map_err(|e| BuildError::Pdf(e.to_string()))?;
        Ok(PageDocument::from(buffer))
    }
}
