//! Print-like styling for converted documents.

use coverpress_types::StyledMarkup;

/// Class of the container element the stylesheet is scoped to.
pub const PRINT_ROOT_CLASS: &str = "coverpress-print";

/// Horizontal page margin applied as container padding.
pub const HORIZONTAL_MARGIN_MM: f32 = 20.0;

const STYLESHEET: &str = r#"
.%ROOT% {
  box-sizing: border-box;
  padding: 0 %MARGIN%mm;
  background: #ffffff;
  color: #000000;
  font-family: "Times New Roman", Times, serif;
  font-size: 12pt;
  line-height: 1.5;
  text-align: justify;
  orphans: 3;
  widows: 3;
}
.%ROOT% p { margin: 0 0 10pt 0; }
.%ROOT% h1, .%ROOT% h2, .%ROOT% h3, .%ROOT% h4, .%ROOT% h5, .%ROOT% h6 {
  font-weight: bold;
  text-align: left;
  margin: 14pt 0 8pt 0;
  page-break-after: avoid;
  break-after: avoid;
}
.%ROOT% h1 { font-size: 20pt; }
.%ROOT% h2 { font-size: 16pt; }
.%ROOT% h3 { font-size: 14pt; }
.%ROOT% h4, .%ROOT% h5, .%ROOT% h6 { font-size: 12pt; }
.%ROOT% ul, .%ROOT% ol { margin: 0 0 10pt 0; padding-left: 24pt; }
.%ROOT% li { margin-bottom: 4pt; }
.%ROOT% table {
  width: 100%;
  border-collapse: collapse;
  margin: 0 0 12pt 0;
  page-break-inside: avoid;
  break-inside: avoid;
}
.%ROOT% th, .%ROOT% td {
  border: 1px solid #000000;
  padding: 4pt 6pt;
  vertical-align: top;
  text-align: left;
}
.%ROOT% th { font-weight: bold; background: #f2f2f2; }
.%ROOT% td p, .%ROOT% th p { margin: 0; }
.%ROOT% img { max-width: 100%; height: auto; }
.%ROOT% a { color: #0000ee; text-decoration: underline; }
"#;

/// The stylesheet with every rule scoped under `root_class`.
pub fn print_stylesheet(root_class: &str) -> String {
    STYLESHEET
        .replace("%ROOT%", root_class)
        .replace("%MARGIN%", &HORIZONTAL_MARGIN_MM.to_string())
}

/// Wraps converted HTML in a print-styled container `width_px` wide.
pub fn print_markup(body_html: &str, width_px: u32) -> StyledMarkup {
    StyledMarkup {
        root_class: PRINT_ROOT_CLASS.to_string(),
        html: format!("<div class=\"{}\">{}</div>", PRINT_ROOT_CLASS, body_html),
        stylesheet: print_stylesheet(PRINT_ROOT_CLASS),
        width_px,
    }
}
