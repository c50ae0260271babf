/// HTML plus the stylesheet that gives it print-like appearance.
///
/// The markup is expected to be a single element whose class is `root_class`;
/// the stylesheet's rules are scoped under that class so they cannot leak into
/// the rest of the page while staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledMarkup {
    pub root_class: String,
    pub html: String,
    pub stylesheet: String,
    /// Fixed layout width of the root element in reference pixels.
    pub width_px: u32,
}
