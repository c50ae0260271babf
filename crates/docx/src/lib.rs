//! Word document conversion.
//!
//! A `.docx` package is read into semantic HTML ([`convert_to_html`]) and
//! wrapped in a print-like stylesheet ([`print_markup`]). Turning that markup
//! into pages needs a layout engine, which lives behind the staging and
//! rasterizer capabilities in `coverpress-core`.

mod error;
mod html;
mod package;
mod print;
mod styles;

pub use error::DocxError;
pub use print::{HORIZONTAL_MARGIN_MM, PRINT_ROOT_CLASS, print_markup, print_stylesheet};

use html::HtmlWriter;
use log::debug;
use package::{DOCUMENT_PART, NUMBERING_PART, Package, STYLES_PART, W_NS};
use styles::{Numbering, Styles};

/// The result of converting a Word document to HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlConversion {
    pub html: String,
    /// Non-fatal problems, such as unrecognised styles or skipped elements.
    pub warnings: Vec<String>,
}

/// Converts the bytes of a `.docx` file to semantic HTML.
///
/// Fails only when the bytes are not a Word package or its main document
/// part cannot be read. Problems with individual elements become warnings.
pub fn convert_to_html(bytes: &[u8]) -> Result<HtmlConversion, DocxError> {
    let package = Package::open(bytes)?;
    let mut warnings = Vec::new();

    let styles = optional_part(&package, STYLES_PART, Styles::parse, &mut warnings)?;
    let numbering = optional_part(&package, NUMBERING_PART, Numbering::parse, &mut warnings)?;
    let relationships = package.relationships()?;

    let xml = package
        .text(DOCUMENT_PART)?
        .ok_or_else(|| DocxError::MissingPart(DOCUMENT_PART.to_string()))?;
    let document = roxmltree::Document::parse(xml).map_err(|source| DocxError::Xml {
        part: DOCUMENT_PART.to_string(),
        source,
    })?;
    let body = document
        .root_element()
        .children()
        .find(|n| n.has_tag_name((W_NS, "body")))
        .ok_or(DocxError::MissingBody)?;

    let mut writer = HtmlWriter::new(&package, &styles, &numbering, &relationships);
    writer.blocks(body);
    let (html, body_warnings) = writer.finish();
    warnings.extend(body_warnings.into_vec());

    debug!(
        "Converted Word document to {} bytes of HTML with {} warning(s)",
        html.len(),
        warnings.len()
    );
    Ok(HtmlConversion { html, warnings })
}

/// Parses a part that may be absent. A malformed part is skipped with a warning.
fn optional_part<T: Default>(
    package: &Package,
    name: &str,
    parse: fn(&str) -> Result<T, roxmltree::Error>,
    warnings: &mut Vec<String>,
) -> Result<T, DocxError> {
    let Some(xml) = package.text(name)? else {
        return Ok(T::default());
    };
    match parse(xml) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            warnings.push(format!("Ignoring malformed {}: {}", name, e));
            Ok(T::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    const W: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing""#;

    const STYLES_XML: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/></w:style>
  <w:style w:type="paragraph" w:styleId="Fancy"><w:name w:val="Fancy Style"/></w:style>
  <w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/>
    <w:pPr><w:numPr><w:numId w:val="1"/></w:numPr></w:pPr></w:style>
</w:styles>"#;

    const NUMBERING_XML: &str = r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:lvl w:ilvl="0"><w:numFmt w:val="bullet"/></w:lvl>
    <w:lvl w:ilvl="1"><w:numFmt w:val="decimal"/></w:lvl>
  </w:abstractNum>
  <w:abstractNum w:abstractNumId="1">
    <w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/></w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
  <w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>
</w:numbering>"#;

    const RELS_XML: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rIdImg" Type="image" Target="media/dot.png"/>
  <Relationship Id="rIdLink" Type="hyperlink" Target="https://example.org/?a=1&amp;b=2" TargetMode="External"/>
</Relationships>"#;

    fn docx(body: &str, extra: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        let document = format!("<w:document {W}><w:body>{body}</w:body></w:document>");
        let mut parts: Vec<(&str, &[u8])> = vec![
            ("[Content_Types].xml", &b"<Types/>"[..]),
            ("word/document.xml", document.as_bytes()),
            ("word/styles.xml", STYLES_XML.as_bytes()),
            ("word/numbering.xml", NUMBERING_XML.as_bytes()),
            ("word/_rels/document.xml.rels", RELS_XML.as_bytes()),
        ];
        parts.extend_from_slice(extra);
        for (name, data) in parts {
            zip.start_file(name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    fn para(text: &str) -> String {
        format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
    }

    fn styled(style: &str, text: &str) -> String {
        format!(r#"<w:p><w:pPr><w:pStyle w:val="{style}"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#)
    }

    fn item(num_id: u32, level: u32, text: &str) -> String {
        format!(
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="{level}"/><w:numId w:val="{num_id}"/></w:numPr></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#
        )
    }

    #[test]
    fn headings_and_paragraphs() {
        let _ = env_logger::builder().is_test(true).try_init();

        let body = [styled("Title", "Report"), styled("Heading1", "Intro"), para("Body text")].concat();
        let result = convert_to_html(&docx(&body, &[])).unwrap();
        assert_eq!(result.html, "<h1>Report</h1><h1>Intro</h1><p>Body text</p>");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn unknown_style_warns_once_and_renders_as_paragraph() {
        let body = [styled("Fancy", "One"), styled("Fancy", "Two")].concat();
        let result = convert_to_html(&docx(&body, &[])).unwrap();
        assert_eq!(result.html, "<p>One</p><p>Two</p>");
        assert_eq!(
            result.warnings,
            vec!["Unrecognised paragraph style: 'Fancy Style' (Style ID: Fancy)".to_string()]
        );
    }

    #[test]
    fn run_formatting_and_escaping() {
        let body = r#"<w:p>
            <w:r><w:rPr><w:b/><w:i/></w:rPr><w:t>bold italic</w:t></w:r>
            <w:r><w:rPr><w:b w:val="0"/></w:rPr><w:t xml:space="preserve"> a &lt; b </w:t></w:r>
            <w:r><w:rPr><w:vertAlign w:val="superscript"/></w:rPr><w:t>2</w:t></w:r>
            <w:r><w:tab/><w:t>x</w:t><w:br/></w:r>
        </w:p>"#;
        let result = convert_to_html(&docx(body, &[])).unwrap();
        assert_eq!(
            result.html,
            "<p><strong><em>bold italic</em></strong> a &lt; b <sup>2</sup>&emsp;x<br></p>"
        );
    }

    #[test]
    fn revisions_are_resolved() {
        let body = r#"<w:p>
            <w:r><w:t>kept </w:t></w:r>
            <w:del w:id="1"><w:r><w:delText>removed</w:delText></w:r></w:del>
            <w:ins w:id="2"><w:r><w:t>added</w:t></w:r></w:ins>
        </w:p>"#;
        let result = convert_to_html(&docx(body, &[])).unwrap();
        assert_eq!(result.html, "<p>kept added</p>");
    }

    #[test]
    fn empty_paragraphs_are_dropped() {
        let body = ["<w:p/>".to_string(), para("Text"), "<w:p><w:r><w:t> </w:t></w:r></w:p>".to_string()].concat();
        let result = convert_to_html(&docx(&body, &[])).unwrap();
        assert_eq!(result.html, "<p>Text</p>");
    }

    #[test]
    fn nested_lists() {
        let body = [
            item(1, 0, "a"),
            item(1, 1, "a.1"),
            item(1, 1, "a.2"),
            item(1, 0, "b"),
            para("after"),
            item(2, 0, "first"),
        ]
        .concat();
        let result = convert_to_html(&docx(&body, &[])).unwrap();
        assert_eq!(
            result.html,
            "<ul><li>a<ol><li>a.1</li><li>a.2</li></ol></li><li>b</li></ul>\
             <p>after</p><ol><li>first</li></ol>"
        );
    }

    #[test]
    fn list_levels_beyond_word_range_are_clamped() {
        let deep = |level: &str, text: &str| {
            format!(
                r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="{level}"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#
            )
        };
        let body = [deep("18446744073709551615", "max"), deep("2000000", "huge"), item(1, 0, "top")].concat();
        let result = convert_to_html(&docx(&body, &[])).unwrap();

        let opened = result.html.matches("<ul>").count() + result.html.matches("<ol>").count();
        assert_eq!(opened, 9);
        assert!(result.html.contains("<li>max</li><li>huge</li>"));
        assert!(result.html.ends_with("<li>top</li></ul>"));
    }

    #[test]
    fn explicit_num_id_zero_overrides_style_numbering() {
        let body = [
            styled("ListBullet", "bullet"),
            r#"<w:p><w:pPr><w:pStyle w:val="ListBullet"/><w:numPr><w:numId w:val="0"/></w:numPr></w:pPr><w:r><w:t>plain</w:t></w:r></w:p>"#
                .to_string(),
        ]
        .concat();
        let result = convert_to_html(&docx(&body, &[])).unwrap();
        assert!(result.html.starts_with("<ul><li>bullet</li></ul>"));
        assert!(result.html.ends_with("<p>plain</p>"));
        assert!(!result.html.contains("<li>plain"));
    }

    #[test]
    fn tables_with_spans_and_header_rows() {
        let body = r#"<w:tbl>
            <w:tblGrid><w:gridCol/><w:gridCol/></w:tblGrid>
            <w:tr><w:trPr><w:tblHeader/></w:trPr>
                <w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>Head</w:t></w:r></w:p></w:tc>
            </w:tr>
            <w:tr>
                <w:tc><w:tcPr><w:vMerge w:val="restart"/></w:tcPr><w:p><w:r><w:t>Tall</w:t></w:r></w:p></w:tc>
                <w:tc><w:p><w:r><w:t>r1</w:t></w:r></w:p></w:tc>
            </w:tr>
            <w:tr>
                <w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc>
                <w:tc><w:p><w:r><w:t>r2</w:t></w:r></w:p></w:tc>
            </w:tr>
        </w:tbl>"#;
        let result = convert_to_html(&docx(body, &[])).unwrap();
        assert_eq!(
            result.html,
            "<table><tr><th colspan=\"2\"><p>Head</p></th></tr>\
             <tr><td rowspan=\"2\"><p>Tall</p></td><td><p>r1</p></td></tr>\
             <tr><td><p>r2</p></td></tr></table>"
        );
    }

    #[test]
    fn hyperlinks_and_images() {
        let png: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        let body = r#"<w:p>
            <w:hyperlink r:id="rIdLink"><w:r><w:t>site</w:t></w:r></w:hyperlink>
            <w:r><w:drawing><wp:inline><wp:extent cx="952500" cy="952500"/>
                <wp:docPr id="1" name="Picture 1" descr="A dot"/>
                <a:graphic><a:graphicData><a:blip r:embed="rIdImg"/></a:graphicData></a:graphic>
            </wp:inline></w:drawing></w:r>
        </w:p>"#;
        let result = convert_to_html(&docx(body, &[("word/media/dot.png", png)])).unwrap();
        assert!(
            result
                .html
                .starts_with("<p><a href=\"https://example.org/?a=1&amp;b=2\">site</a><img src=\"data:image/png;base64,")
        );
        assert!(result.html.ends_with("alt=\"A dot\" width=\"100\"></p>"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn missing_image_part_is_a_warning() {
        let body = r#"<w:p><w:r><w:t>x</w:t></w:r><w:r><w:drawing><a:blip r:embed="rIdImg"/></w:drawing></w:r></w:p>"#;
        let result = convert_to_html(&docx(body, &[])).unwrap();
        assert_eq!(result.html, "<p>x</p>");
        assert_eq!(result.warnings, vec!["Image part 'word/media/dot.png' is missing".to_string()]);
    }

    #[test]
    fn unsupported_elements_are_skipped_with_a_warning() {
        let body = format!("{}<w:altChunk r:id=\"rId9\"/>", para("ok"));
        let result = convert_to_html(&docx(&body, &[])).unwrap();
        assert_eq!(result.html, "<p>ok</p>");
        assert_eq!(result.warnings, vec!["Unsupported element skipped: w:altChunk".to_string()]);
    }

    #[test]
    fn content_controls_are_unwrapped() {
        let body = format!("<w:sdt><w:sdtPr/><w:sdtContent>{}</w:sdtContent></w:sdt>", para("inside"));
        let result = convert_to_html(&docx(&body, &[])).unwrap();
        assert_eq!(result.html, "<p>inside</p>");
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(matches!(
            convert_to_html(b"definitely not a zip archive"),
            Err(DocxError::Archive(_))
        ));
    }

    #[test]
    fn package_without_main_document_is_rejected() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("hello.txt", SimpleFileOptions::default()).unwrap();
        zip.write_all(b"hi").unwrap();
        let bytes = zip.finish().unwrap().into_inner();
        assert!(matches!(convert_to_html(&bytes), Err(DocxError::MissingPart(_))));
    }

    #[test]
    fn malformed_document_xml_is_rejected() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/document.xml", SimpleFileOptions::default()).unwrap();
        zip.write_all(b"<w:document><unclosed>").unwrap();
        let bytes = zip.finish().unwrap().into_inner();
        assert!(matches!(convert_to_html(&bytes), Err(DocxError::Xml { .. })));
    }
}
