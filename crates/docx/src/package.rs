//! The zip container of a Word document and its relationship parts.

use crate::error::DocxError;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub(crate) const DOCUMENT_PART: &str = "word/document.xml";
pub(crate) const STYLES_PART: &str = "word/styles.xml";
pub(crate) const NUMBERING_PART: &str = "word/numbering.xml";
pub(crate) const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

pub(crate) const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const R_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const WP_NS: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
pub(crate) const V_NS: &str = "urn:schemas-microsoft-com:vml";
pub(crate) const MC_NS: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// The `word/` parts of a package, read eagerly.
pub(crate) struct Package {
    parts: HashMap<String, Vec<u8>>,
}

impl Package {
    pub fn open(bytes: &[u8]) -> Result<Self, DocxError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = HashMap::new();

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().trim_start_matches('/').to_string();
            if !name.starts_with("word/") {
                continue;
            }
            let mut data = Vec::new();
            file.read_to_end(&mut data)
                .map_err(|source| DocxError::Read {
                    part: name.clone(),
                    source,
                })?;
            parts.insert(name, data);
        }

        if !parts.contains_key(DOCUMENT_PART) {
            return Err(DocxError::MissingPart(DOCUMENT_PART.to_string()));
        }
        log::debug!("Opened Word package with {} part(s)", parts.len());
        Ok(Self { parts })
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(Vec::as_slice)
    }

    /// Returns an XML part as text, without a leading byte-order mark.
    pub fn text(&self, name: &str) -> Result<Option<&str>, DocxError> {
        let Some(bytes) = self.part(name) else {
            return Ok(None);
        };
        let text = std::str::from_utf8(bytes).map_err(|_| DocxError::Encoding {
            part: name.to_string(),
        })?;
        Ok(Some(text.trim_start_matches('\u{feff}')))
    }

    pub fn relationships(&self) -> Result<Relationships, DocxError> {
        match self.text(DOCUMENT_RELS_PART)? {
            Some(xml) => Relationships::parse(xml).map_err(|source| DocxError::Xml {
                part: DOCUMENT_RELS_PART.to_string(),
                source,
            }),
            None => Ok(Relationships::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub target: String,
    pub external: bool,
}

/// Relationships of the main document part, keyed by `r:id`.
#[derive(Debug, Default)]
pub(crate) struct Relationships {
    by_id: HashMap<String, Relationship>,
}

impl Relationships {
    pub fn parse(xml: &str) -> Result<Self, roxmltree::Error> {
        let doc = roxmltree::Document::parse(xml)?;
        let by_id = doc
            .root_element()
            .children()
            .filter(|n| n.has_tag_name((PKG_REL_NS, "Relationship")))
            .filter_map(|n| {
                let id = n.attribute("Id")?;
                let target = n.attribute("Target")?;
                let external = n.attribute("TargetMode") == Some("External");
                let target = if external {
                    target.to_string()
                } else {
                    resolve_part("word", target)
                };
                Some((id.to_string(), Relationship { target, external }))
            })
            .collect();
        Ok(Self { by_id })
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }
}

/// Resolves a relationship target against the directory of its source part.
pub(crate) fn resolve_part(base_dir: &str, target: &str) -> String {
    let mut segments: Vec<&str> = if target.starts_with('/') {
        Vec::new()
    } else {
        base_dir.split('/').filter(|s| !s.is_empty()).collect()
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
