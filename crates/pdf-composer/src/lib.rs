//! Merging page documents.
//!
//! Pages are moved between documents as structural units: the page
//! dictionary and everything it references are deep-copied into the target
//! with fresh object ids. Nothing is re-rendered, so the copied pages are
//! byte-for-byte the content streams and images of the originals.
//!
//! Merging happens in two steps so callers can report progress between them:
//! [`parse_all`] validates every input and counts its pages, [`merge`]
//! stitches the parsed inputs together.

mod error;

pub use error::MergeError;

use coverpress_types::PageDocument;
use log::{debug, info};
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::HashMap;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against malformed page trees whose `Parent` chain loops.
const MAX_TREE_DEPTH: usize = 64;

/// An input document that parsed successfully.
pub struct ParsedDocument {
    document: Document,
    page_count: usize,
}

impl ParsedDocument {
    /// Parses PDF bytes. Encrypted documents are rejected.
    pub fn parse(bytes: &[u8]) -> Result<Self, MergeError> {
        parse_indexed(bytes, 0)
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

fn parse_indexed(bytes: &[u8], index: usize) -> Result<ParsedDocument, MergeError> {
    // Checked on the raw bytes: the parser may decrypt with an empty user
    // password and drop the key from the trailer it hands back.
    if declares_encryption(bytes) {
        return Err(MergeError::Encrypted { index });
    }
    let document =
        Document::load_mem(bytes).map_err(|source| MergeError::Malformed { index, source })?;
    if document.trailer.has(b"Encrypt") {
        return Err(MergeError::Encrypted { index });
    }
    let page_count = document.get_pages().len();
    debug!("Parsed document {} with {} page(s)", index, page_count);
    Ok(ParsedDocument {
        document,
        page_count,
    })
}

/// Whether a trailer or cross-reference stream dictionary carries an
/// `/Encrypt` entry, either an indirect reference or an inline dictionary.
fn declares_encryption(bytes: &[u8]) -> bool {
    const KEY: &[u8] = b"/Encrypt";
    bytes
        .windows(KEY.len())
        .enumerate()
        .filter(|(_, window)| *window == KEY)
        .any(|(start, _)| is_dictionary_or_reference(&bytes[start + KEY.len()..]))
}

/// Matches `<<` or `<num> <gen> R` after optional whitespace.
fn is_dictionary_or_reference(rest: &[u8]) -> bool {
    let skip_space = |s: &[u8]| s.iter().take_while(|b| b.is_ascii_whitespace()).count();
    let skip_digits = |s: &[u8]| s.iter().take_while(|b| b.is_ascii_digit()).count();

    let mut at = skip_space(rest);
    if rest[at..].starts_with(b"<<") {
        return true;
    }
    for _ in 0..2 {
        let digits = skip_digits(&rest[at..]);
        if digits == 0 {
            return false;
        }
        at += digits;
        let space = skip_space(&rest[at..]);
        if space == 0 {
            return false;
        }
        at += space;
    }
    rest[at..].first() == Some(&b'R')
}

/// Parses every input, reporting the position of the first bad one.
pub fn parse_all(documents: &[PageDocument]) -> Result<Vec<ParsedDocument>, MergeError> {
    documents
        .iter()
        .enumerate()
        .map(|(index, doc)| parse_indexed(doc.as_bytes(), index))
        .collect()
}

/// Counts the pages of a document without merging it.
pub fn page_count(document: &PageDocument) -> Result<usize, MergeError> {
    Ok(ParsedDocument::parse(document.as_bytes())?.page_count())
}

/// Parses and merges in one step.
pub fn merge_all(documents: &[PageDocument]) -> Result<PageDocument, MergeError> {
    merge(&parse_all(documents)?)
}

/// Builds a new document whose pages are the inputs' pages, in input order.
pub fn merge(documents: &[ParsedDocument]) -> Result<PageDocument, MergeError> {
    if documents.is_empty() {
        return Err(MergeError::NoInputs);
    }

    let mut target = Document::with_version("1.7");
    let pages_id = target.new_object_id();

    let mut kids = Vec::new();
    for parsed in documents {
        let mut importer = PageImporter::new(&parsed.document, &mut target);
        kids.extend(importer.import_pages()?);
    }

    for &page_id in &kids {
        if let Ok(Object::Dictionary(page)) = target.get_object_mut(page_id) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    let page_count = kids.len();
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
        "Count" => page_count as i64,
    };
    target.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = target.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    target.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    target
        .save_to(&mut buffer)
        .map_err(|e| MergeError::Write(e.to_string()))?;

    info!(
        "Merged {} document(s) into {} page(s), {} bytes",
        documents.len(),
        page_count,
        buffer.len()
    );
    Ok(PageDocument::from(buffer))
}

/// Copies the pages of one source document into a target document.
struct PageImporter<'a> {
    source: &'a Document,
    target: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
}

impl<'a> PageImporter<'a> {
    fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self {
            source,
            target,
            id_map: HashMap::new(),
        }
    }

    /// Imports every page in page order and returns the new page ids.
    ///
    /// Page ids are reserved up front so that references between pages
    /// (link annotations, `/P` entries) land on the copied pages instead of
    /// dragging the source page tree along.
    fn import_pages(&mut self) -> Result<Vec<ObjectId>, lopdf::Error> {
        let pages: Vec<ObjectId> = self.source.get_pages().into_values().collect();
        for &page_id in &pages {
            let new_id = self.target.new_object_id();
            self.id_map.insert(page_id, new_id);
        }

        let mut imported = Vec::with_capacity(pages.len());
        for page_id in pages {
            let mut page = self.source.get_dictionary(page_id)?.clone();
            for key in INHERITABLE {
                if !page.has(key) {
                    if let Some(value) = self.inherited(page_id, key) {
                        page.set(key.to_vec(), value);
                    }
                }
            }
            // The target builds its own tree; thread beads point into the source's.
            page.remove(b"Parent");
            page.remove(b"B");

            let new_id = self.id_map[&page_id];
            let remapped = self.remap_dictionary(page)?;
            self.target
                .objects
                .insert(new_id, Object::Dictionary(remapped));
            imported.push(new_id);
        }
        Ok(imported)
    }

    /// Looks up `key` on the nearest ancestor of `page_id` that defines it.
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Option<Object> {
        let mut current = self.source.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_TREE_DEPTH {
            let parent_id = current.get(b"Parent").and_then(Object::as_reference).ok()?;
            let parent = self.source.get_dictionary(parent_id).ok()?;
            if let Ok(value) = parent.get(key) {
                return Some(value.clone());
            }
            current = parent;
        }
        None
    }

    /// Deep-copies an object and everything it references, once per source id.
    fn copy_object(&mut self, source_id: ObjectId) -> Result<ObjectId, lopdf::Error> {
        if let Some(target_id) = self.id_map.get(&source_id) {
            return Ok(*target_id);
        }

        // Reserve the id before recursing so reference cycles terminate.
        let new_id = self.target.add_object(Object::Null);
        self.id_map.insert(source_id, new_id);

        let object = match self.source.get_object(source_id) {
            Ok(object) => object.clone(),
            Err(_) => {
                debug!("Dangling reference {:?} copied as null", source_id);
                return Ok(new_id);
            }
        };
        let remapped = self.remap_references(object)?;
        self.target.objects.insert(new_id, remapped);
        Ok(new_id)
    }

    fn remap_references(&mut self, object: Object) -> Result<Object, lopdf::Error> {
        match object {
            Object::Reference(id) => Ok(Object::Reference(self.copy_object(id)?)),
            Object::Array(items) => items
                .into_iter()
                .map(|item| self.remap_references(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Object::Array),
            Object::Dictionary(dict) => Ok(Object::Dictionary(self.remap_dictionary(dict)?)),
            Object::Stream(mut stream) => {
                stream.dict = self.remap_dictionary(stream.dict)?;
                Ok(Object::Stream(stream))
            }
            other => Ok(other),
        }
    }

    fn remap_dictionary(&mut self, mut dict: Dictionary) -> Result<Dictionary, lopdf::Error> {
        for (_, value) in dict.iter_mut() {
            let taken = std::mem::replace(value, Object::Null);
            *value = self.remap_references(taken)?;
        }
        Ok(dict)
    }
}
