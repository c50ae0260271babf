//! Paragraph style and list numbering definitions.

use crate::package::W_NS;
use roxmltree::Node;
use std::collections::HashMap;

/// How a paragraph style maps onto HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockRole {
    Paragraph,
    Heading(u8),
}

/// Styles that render as plain paragraphs without a warning.
const PLAIN_STYLES: &[&str] = &[
    "normal",
    "body text",
    "no spacing",
    "list paragraph",
    "normal (web)",
    "plain text",
];

/// Reads a `w:val` attribute.
pub(crate) fn val<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attribute((W_NS, "val"))
}

pub(crate) fn w_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.has_tag_name((W_NS, name)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NumberingRef {
    pub num_id: String,
    pub level: usize,
}

/// Deepest list level Word can express (`w:ilvl` runs 0..=8).
pub(crate) const MAX_LIST_LEVEL: usize = 8;

/// Reads `w:numPr` from a paragraph or style property node.
pub(crate) fn numbering_ref(properties: Node) -> Option<NumberingRef> {
    let num_pr = w_child(properties, "numPr")?;
    let num_id = w_child(num_pr, "numId").and_then(val)?;
    if num_id == "0" {
        return None;
    }
    let level = w_child(num_pr, "ilvl")
        .and_then(val)
        .and_then(|v| v.parse::<usize>().ok())
        .map(|level| level.min(MAX_LIST_LEVEL))
        .unwrap_or(0);
    Some(NumberingRef {
        num_id: num_id.to_string(),
        level,
    })
}

/// Whether `w:numId w:val="0"` switches numbering off for this node,
/// overriding any numbering its style carries.
pub(crate) fn numbering_disabled(properties: Node) -> bool {
    w_child(properties, "numPr")
        .and_then(|num_pr| w_child(num_pr, "numId"))
        .and_then(val)
        .is_some_and(|id| id == "0")
}

#[derive(Debug, Clone)]
struct StyleDef {
    name: String,
    numbering: Option<NumberingRef>,
}

/// Paragraph styles declared in `word/styles.xml`, keyed by style id.
#[derive(Debug, Default)]
pub(crate) struct Styles {
    paragraph: HashMap<String, StyleDef>,
}

impl Styles {
    pub fn parse(xml: &str) -> Result<Self, roxmltree::Error> {
        let doc = roxmltree::Document::parse(xml)?;
        let paragraph = doc
            .root_element()
            .children()
            .filter(|n| n.has_tag_name((W_NS, "style")))
            .filter(|n| n.attribute((W_NS, "type")) == Some("paragraph"))
            .filter_map(|n| {
                let id = n.attribute((W_NS, "styleId"))?;
                let name = w_child(n, "name").and_then(val).unwrap_or(id);
                let numbering = w_child(n, "pPr").and_then(numbering_ref);
                Some((
                    id.to_string(),
                    StyleDef {
                        name: name.to_string(),
                        numbering,
                    },
                ))
            })
            .collect();
        Ok(Self { paragraph })
    }

    /// Display name of a style, falling back to its id.
    pub fn name<'a>(&'a self, style_id: &'a str) -> &'a str {
        self.paragraph
            .get(style_id)
            .map(|s| s.name.as_str())
            .unwrap_or(style_id)
    }

    /// Numbering a style applies to every paragraph that uses it.
    pub fn numbering(&self, style_id: &str) -> Option<&NumberingRef> {
        self.paragraph.get(style_id)?.numbering.as_ref()
    }

    /// Classifies a style; `None` means the style is not recognised.
    pub fn role(&self, style_id: &str) -> Option<BlockRole> {
        role_for_name(self.name(style_id)).or_else(|| role_for_name(style_id))
    }
}

fn role_for_name(name: &str) -> Option<BlockRole> {
    let lower = name.trim().to_ascii_lowercase();
    if lower == "title" {
        return Some(BlockRole::Heading(1));
    }
    if let Some(level) = lower.strip_prefix("heading") {
        let level: u8 = level.trim().parse().ok()?;
        return (level >= 1).then(|| BlockRole::Heading(level.min(6)));
    }
    if PLAIN_STYLES.contains(&lower.as_str()) || lower.starts_with("list") {
        return Some(BlockRole::Paragraph);
    }
    None
}

/// List definitions from `word/numbering.xml`.
#[derive(Debug, Default)]
pub(crate) struct Numbering {
    /// numId -> ordered flag per level.
    instances: HashMap<String, HashMap<usize, bool>>,
}

impl Numbering {
    pub fn parse(xml: &str) -> Result<Self, roxmltree::Error> {
        let doc = roxmltree::Document::parse(xml)?;
        let root = doc.root_element();

        let abstracts: HashMap<&str, HashMap<usize, bool>> = root
            .children()
            .filter(|n| n.has_tag_name((W_NS, "abstractNum")))
            .filter_map(|n| {
                let id = n.attribute((W_NS, "abstractNumId"))?;
                let levels = n
                    .children()
                    .filter(|l| l.has_tag_name((W_NS, "lvl")))
                    .filter_map(|l| {
                        let level = l.attribute((W_NS, "ilvl"))?.parse().ok()?;
                        let format = w_child(l, "numFmt").and_then(val).unwrap_or("bullet");
                        Some((level, !matches!(format, "bullet" | "none")))
                    })
                    .collect();
                Some((id, levels))
            })
            .collect();

        let instances = root
            .children()
            .filter(|n| n.has_tag_name((W_NS, "num")))
            .filter_map(|n| {
                let num_id = n.attribute((W_NS, "numId"))?;
                let abstract_id = w_child(n, "abstractNumId").and_then(val)?;
                let levels = abstracts.get(abstract_id)?.clone();
                Some((num_id.to_string(), levels))
            })
            .collect();
        Ok(Self { instances })
    }

    /// Whether a list level is numbered; unknown lists render as bullets.
    pub fn is_ordered(&self, reference: &NumberingRef) -> bool {
        self.instances
            .get(&reference.num_id)
            .and_then(|levels| levels.get(&reference.level))
            .copied()
            .unwrap_or(false)
    }
}
