//! Walks `word/document.xml` and writes semantic HTML.

use crate::package::{A_NS, MC_NS, Package, R_NS, Relationships, V_NS, W_NS, WP_NS};
use crate::styles::{
    BlockRole, MAX_LIST_LEVEL, Numbering, Styles, numbering_disabled, numbering_ref, val, w_child,
};
use coverpress_types::DataUri;
use quick_xml::escape::escape;
use roxmltree::Node;
use std::collections::HashSet;

/// English Metric Units per CSS pixel at 96 DPI.
const EMU_PER_PX: u64 = 9525;

/// Body-level and run-level bookkeeping elements that carry no content.
const IGNORED: &[&str] = &[
    "pPr",
    "rPr",
    "tblPr",
    "tblGrid",
    "trPr",
    "tcPr",
    "sectPr",
    "bookmarkStart",
    "bookmarkEnd",
    "proofErr",
    "permStart",
    "permEnd",
    "commentRangeStart",
    "commentRangeEnd",
    "lastRenderedPageBreak",
    "fldChar",
    "instrText",
    "sdtPr",
    "sdtEndPr",
];

/// Wrappers whose children are rendered as if the wrapper were absent.
const TRANSPARENT: &[&str] = &["ins", "smartTag", "customXml", "fldSimple", "moveTo"];

/// Revisions whose content is not part of the final document.
const DROPPED: &[&str] = &["del", "moveFrom"];

/// Non-fatal problems met while converting, each reported once.
#[derive(Debug, Default)]
pub(crate) struct Warnings {
    seen: HashSet<String>,
    messages: Vec<String>,
}

impl Warnings {
    pub fn push(&mut self, message: String) {
        if self.seen.insert(message.clone()) {
            self.messages.push(message);
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        self.messages
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenList {
    ordered: bool,
    item_open: bool,
}

pub(crate) struct HtmlWriter<'p> {
    package: &'p Package,
    styles: &'p Styles,
    numbering: &'p Numbering,
    relationships: &'p Relationships,
    out: String,
    lists: Vec<OpenList>,
    warnings: Warnings,
}

impl<'p> HtmlWriter<'p> {
    pub fn new(
        package: &'p Package,
        styles: &'p Styles,
        numbering: &'p Numbering,
        relationships: &'p Relationships,
    ) -> Self {
        Self {
            package,
            styles,
            numbering,
            relationships,
            out: String::new(),
            lists: Vec::new(),
            warnings: Warnings::default(),
        }
    }

    pub fn finish(mut self) -> (String, Warnings) {
        self.close_lists();
        (self.out, self.warnings)
    }

    /// Writes the block-level children of a body, cell or content control.
    pub fn blocks(&mut self, container: Node) {
        for child in container.children().filter(Node::is_element) {
            if child.tag_name().namespace() != Some(W_NS) {
                self.unsupported(child);
                continue;
            }
            match child.tag_name().name() {
                "p" => self.paragraph(child),
                "tbl" => {
                    self.close_lists();
                    self.table(child);
                }
                "sdt" => {
                    if let Some(content) = w_child(child, "sdtContent") {
                        self.blocks(content);
                    }
                }
                name if TRANSPARENT.contains(&name) => self.blocks(child),
                name if DROPPED.contains(&name) || IGNORED.contains(&name) => {}
                _ => self.unsupported(child),
            }
        }
    }

    fn paragraph(&mut self, paragraph: Node) {
        let properties = w_child(paragraph, "pPr");
        let style_id = properties
            .and_then(|p| w_child(p, "pStyle"))
            .and_then(val);

        let mut content = String::new();
        self.inline(paragraph, &mut content);
        if content.trim().is_empty() {
            return;
        }

        let numbering = if properties.is_some_and(numbering_disabled) {
            None
        } else {
            properties
                .and_then(numbering_ref)
                .or_else(|| style_id.and_then(|id| self.styles.numbering(id)).cloned())
        };

        if let Some(numbering) = numbering {
            let ordered = self.numbering.is_ordered(&numbering);
            self.list_item(numbering.level, ordered, &content);
            return;
        }

        self.close_lists();
        let role = match style_id {
            None => BlockRole::Paragraph,
            Some(id) => match self.styles.role(id) {
                Some(role) => role,
                None => {
                    self.warnings.push(format!(
                        "Unrecognised paragraph style: '{}' (Style ID: {})",
                        self.styles.name(id),
                        id
                    ));
                    BlockRole::Paragraph
                }
            },
        };
        let tag = match role {
            BlockRole::Paragraph => "p".to_string(),
            BlockRole::Heading(level) => format!("h{}", level),
        };
        self.out.push_str(&format!("<{tag}>{content}</{tag}>"));
    }

    fn list_item(&mut self, level: usize, ordered: bool, content: &str) {
        let depth = level.min(MAX_LIST_LEVEL).saturating_add(1);
        while self.lists.len() > depth {
            self.close_list();
        }
        if self.lists.len() == depth {
            let switches_type = self.lists.last().is_some_and(|l| l.ordered != ordered);
            if switches_type {
                self.close_list();
            } else if let Some(top) = self.lists.last_mut() {
                if top.item_open {
                    self.out.push_str("</li>");
                    top.item_open = false;
                }
            }
        }
        while self.lists.len() < depth {
            if let Some(parent) = self.lists.last_mut() {
                if !parent.item_open {
                    self.out.push_str("<li>");
                    parent.item_open = true;
                }
            }
            self.out.push_str(if ordered { "<ol>" } else { "<ul>" });
            self.lists.push(OpenList {
                ordered,
                item_open: false,
            });
        }
        self.out.push_str("<li>");
        self.out.push_str(content);
        if let Some(top) = self.lists.last_mut() {
            top.item_open = true;
        }
    }

    fn close_list(&mut self) {
        if let Some(list) = self.lists.pop() {
            if list.item_open {
                self.out.push_str("</li>");
            }
            self.out.push_str(if list.ordered { "</ol>" } else { "</ul>" });
        }
    }

    fn close_lists(&mut self) {
        while !self.lists.is_empty() {
            self.close_list();
        }
    }

    fn table(&mut self, table: Node) {
        let rows: Vec<Vec<Cell>> = table
            .children()
            .filter(|n| n.has_tag_name((W_NS, "tr")))
            .map(row_cells)
            .collect();
        let headers: Vec<bool> = table
            .children()
            .filter(|n| n.has_tag_name((W_NS, "tr")))
            .map(|row| {
                w_child(row, "trPr")
                    .and_then(|p| w_child(p, "tblHeader"))
                    .is_some_and(toggle_on)
            })
            .collect();

        self.out.push_str("<table>");
        for (index, row) in rows.iter().enumerate() {
            self.out.push_str("<tr>");
            let tag = if headers[index] { "th" } else { "td" };
            for cell in row {
                if cell.merge == Merge::Continue {
                    continue;
                }
                let row_span = if cell.merge == Merge::Restart {
                    1 + rows[index + 1..]
                        .iter()
                        .take_while(|next| {
                            next.iter()
                                .any(|c| c.column == cell.column && c.merge == Merge::Continue)
                        })
                        .count()
                } else {
                    1
                };

                self.out.push('<');
                self.out.push_str(tag);
                if cell.span > 1 {
                    self.out.push_str(&format!(" colspan=\"{}\"", cell.span));
                }
                if row_span > 1 {
                    self.out.push_str(&format!(" rowspan=\"{}\"", row_span));
                }
                self.out.push('>');
                self.blocks(cell.node);
                self.close_lists();
                self.out.push_str(&format!("</{tag}>"));
            }
            self.out.push_str("</tr>");
        }
        self.out.push_str("</table>");
    }

    /// Writes the inline content of a paragraph or inline wrapper into `out`.
    fn inline(&mut self, parent: Node, out: &mut String) {
        for child in parent.children().filter(Node::is_element) {
            if child.tag_name().namespace() != Some(W_NS) {
                self.unsupported(child);
                continue;
            }
            match child.tag_name().name() {
                "r" => self.run(child, out),
                "hyperlink" => self.hyperlink(child, out),
                "sdt" => {
                    if let Some(content) = w_child(child, "sdtContent") {
                        self.inline(content, out);
                    }
                }
                name if TRANSPARENT.contains(&name) => self.inline(child, out),
                name if DROPPED.contains(&name) || IGNORED.contains(&name) => {}
                _ => self.unsupported(child),
            }
        }
    }

    fn hyperlink(&mut self, link: Node, out: &mut String) {
        let href = link
            .attribute((R_NS, "id"))
            .and_then(|id| self.relationships.get(id))
            .filter(|rel| rel.external)
            .map(|rel| rel.target.clone())
            .or_else(|| link.attribute((W_NS, "anchor")).map(|a| format!("#{}", a)));

        let mut inner = String::new();
        self.inline(link, &mut inner);
        match href {
            Some(href) if !inner.is_empty() => {
                out.push_str(&format!("<a href=\"{}\">{}</a>", escape(href.as_str()), inner));
            }
            _ => out.push_str(&inner),
        }
    }

    fn run(&mut self, run: Node, out: &mut String) {
        let mut text = String::new();
        self.run_content(run, &mut text);
        if text.is_empty() {
            return;
        }

        let tags = w_child(run, "rPr").map(run_tags).unwrap_or_default();
        for tag in &tags {
            out.push_str(&format!("<{tag}>"));
        }
        out.push_str(&text);
        for tag in tags.iter().rev() {
            out.push_str(&format!("</{tag}>"));
        }
    }

    fn run_content(&mut self, parent: Node, text: &mut String) {
        for child in parent.children().filter(Node::is_element) {
            match (child.tag_name().namespace(), child.tag_name().name()) {
                (Some(W_NS), "t") => {
                    text.push_str(&escape(child.text().unwrap_or_default()));
                }
                (Some(W_NS), "tab") => text.push_str("&emsp;"),
                (Some(W_NS), "br") | (Some(W_NS), "cr") => text.push_str("<br>"),
                (Some(W_NS), "noBreakHyphen") => text.push('-'),
                (Some(W_NS), "softHyphen") => text.push_str("&shy;"),
                (Some(W_NS), "drawing") => self.drawing(child, text),
                (Some(W_NS), "pict") => self.vml_picture(child, text),
                (Some(MC_NS), "AlternateContent") => {
                    // Prefer the fallback, which older consumers are meant to understand.
                    let branch = child
                        .children()
                        .find(|n| n.has_tag_name((MC_NS, "Fallback")))
                        .or_else(|| child.children().find(|n| n.has_tag_name((MC_NS, "Choice"))));
                    if let Some(branch) = branch {
                        self.run_content(branch, text);
                    }
                }
                (Some(W_NS), "footnoteReference") | (Some(W_NS), "endnoteReference") => {
                    self.warnings
                        .push("Footnotes and endnotes are not supported".to_string());
                }
                (Some(W_NS), name) if IGNORED.contains(&name) => {}
                (Some(W_NS), "delText") => {}
                _ => self.unsupported(child),
            }
        }
    }

    fn drawing(&mut self, drawing: Node, out: &mut String) {
        let Some(blip) = drawing
            .descendants()
            .find(|n| n.has_tag_name((A_NS, "blip")))
        else {
            self.warnings
                .push("Drawing without an embedded picture skipped".to_string());
            return;
        };
        let doc_pr = drawing
            .descendants()
            .find(|n| n.has_tag_name((WP_NS, "docPr")));
        let alt = doc_pr
            .and_then(|n| n.attribute("descr").or_else(|| n.attribute("title")))
            .unwrap_or_default();
        let width_px = drawing
            .descendants()
            .find(|n| n.has_tag_name((WP_NS, "extent")))
            .and_then(|n| n.attribute("cx"))
            .and_then(|cx| cx.parse::<u64>().ok())
            .map(|emu| emu / EMU_PER_PX)
            .filter(|px| *px > 0);

        let reference = blip
            .attribute((R_NS, "embed"))
            .or_else(|| blip.attribute((R_NS, "link")));
        self.image(reference, alt, width_px, out);
    }

    fn vml_picture(&mut self, picture: Node, out: &mut String) {
        let data = picture
            .descendants()
            .find(|n| n.has_tag_name((V_NS, "imagedata")));
        let reference = data.and_then(|n| n.attribute((R_NS, "id")));
        let alt = data.and_then(|n| n.attribute("title")).unwrap_or_default();
        self.image(reference, alt, None, out);
    }

    fn image(&mut self, reference: Option<&str>, alt: &str, width_px: Option<u64>, out: &mut String) {
        let Some(rel) = reference.and_then(|id| self.relationships.get(id)) else {
            self.warnings
                .push(format!("Image reference {:?} could not be resolved", reference));
            return;
        };

        let src = if rel.external {
            rel.target.clone()
        } else {
            let Some(bytes) = self.package.part(&rel.target) else {
                self.warnings
                    .push(format!("Image part '{}' is missing", rel.target));
                return;
            };
            let mime = mime_guess::from_path(&rel.target).first_or_octet_stream();
            DataUri::new(mime.essence_str(), bytes.to_vec()).to_string()
        };

        out.push_str(&format!("<img src=\"{}\" alt=\"{}\"", escape(src.as_str()), escape(alt)));
        if let Some(width) = width_px {
            out.push_str(&format!(" width=\"{}\"", width));
        }
        out.push('>');
    }

    fn unsupported(&mut self, node: Node) {
        let tag = node.tag_name();
        let prefix = tag
            .namespace()
            .and_then(|ns| node.lookup_prefix(ns))
            .unwrap_or_default();
        let name = if prefix.is_empty() {
            tag.name().to_string()
        } else {
            format!("{}:{}", prefix, tag.name())
        };
        self.warnings
            .push(format!("Unsupported element skipped: {}", name));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Merge {
    None,
    Restart,
    Continue,
}

struct Cell<'a, 'input> {
    node: Node<'a, 'input>,
    column: usize,
    span: usize,
    merge: Merge,
}

fn row_cells<'a, 'input>(row: Node<'a, 'input>) -> Vec<Cell<'a, 'input>> {
    let mut column = 0;
    row.children()
        .filter(|n| n.has_tag_name((W_NS, "tc")))
        .map(|node| {
            let properties = w_child(node, "tcPr");
            let span = properties
                .and_then(|p| w_child(p, "gridSpan"))
                .and_then(val)
                .and_then(|v| v.parse().ok())
                .unwrap_or(1usize)
                .max(1);
            let merge = match properties.and_then(|p| w_child(p, "vMerge")) {
                None => Merge::None,
                Some(v) if val(v) == Some("restart") => Merge::Restart,
                Some(_) => Merge::Continue,
            };
            let cell = Cell {
                node,
                column,
                span,
                merge,
            };
            column += span;
            cell
        })
        .collect()
}

/// Reads an on/off property such as `<w:b/>` or `<w:b w:val="false"/>`.
fn toggle_on(node: Node) -> bool {
    !matches!(val(node), Some("0" | "false" | "off" | "none"))
}

/// Inline HTML tags for run properties, outermost first.
fn run_tags(properties: Node) -> Vec<&'static str> {
    let on = |name: &str| w_child(properties, name).is_some_and(toggle_on);
    let mut tags = Vec::new();
    if on("b") {
        tags.push("strong");
    }
    if on("i") {
        tags.push("em");
    }
    if on("u") {
        tags.push("u");
    }
    if on("strike") || on("dstrike") {
        tags.push("s");
    }
    match w_child(properties, "vertAlign").and_then(val) {
        Some("superscript") => tags.push("sup"),
        Some("subscript") => tags.push("sub"),
        _ => {}
    }
    tags
}
