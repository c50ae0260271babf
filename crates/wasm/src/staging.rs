//! Off-screen staging in the live DOM.

use coverpress_traits::{StagingError, StagingHost};
use coverpress_types::StyledMarkup;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

/// Attribute set on every node this host inserts.
pub const STAGING_ATTRIBUTE: &str = "data-coverpress-staging";

/// Everything mounted for one staged node.
#[derive(Debug)]
pub struct StagedElement {
    element: HtmlElement,
    stylesheet: Option<Element>,
}

impl StagedElement {
    /// The element to capture.
    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

/// Mounts staged nodes into the page's `<body>`, parked outside the viewport.
#[derive(Debug, Clone)]
pub struct DomStagingHost {
    document: Document,
}

impl DomStagingHost {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// The host for the current window's document, if there is one.
    pub fn current() -> Option<Self> {
        web_sys::window()
            .and_then(|w| w.document())
            .map(Self::new)
    }

    fn body(&self) -> Result<HtmlElement, StagingError> {
        self.document
            .body()
            .ok_or_else(|| StagingError::Mount("document has no <body>".to_string()))
    }

    fn create(&self, tag: &str) -> Result<Element, StagingError> {
        let element = self
            .document
            .create_element(tag)
            .map_err(|e| StagingError::Mount(format!("cannot create <{}>: {:?}", tag, e)))?;
        mark(&element)?;
        Ok(element)
    }
}

fn mark(element: &Element) -> Result<(), StagingError> {
    element
        .set_attribute(STAGING_ATTRIBUTE, "")
        .map_err(|e| StagingError::Mount(format!("{:?}", e)))
}

fn park(element: &HtmlElement, width_px: u32, height_px: Option<u32>) -> Result<(), StagingError> {
    let style = element.style();
    let width = format!("{}px", width_px);
    let height = height_px.map(|h| format!("{}px", h));
    let mut properties = vec![
        ("position", "absolute"),
        ("left", "-9999px"),
        ("top", "0px"),
        ("width", width.as_str()),
        ("transform", "none"),
        ("margin", "0"),
    ];
    if let Some(height) = &height {
        properties.push(("height", height.as_str()));
    }
    for (name, value) in properties {
        style
            .set_property(name, value)
            .map_err(|e| StagingError::Mount(format!("cannot set {}: {:?}", name, e)))?;
    }
    Ok(())
}

impl StagingHost for DomStagingHost {
    type Node = StagedElement;

    fn stage_clone(
        &self,
        source_id: &str,
        width_px: u32,
        height_px: u32,
    ) -> Result<StagedElement, StagingError> {
        let source = self
            .document
            .get_element_by_id(source_id)
            .ok_or_else(|| StagingError::ElementNotFound(source_id.to_string()))?;
        let element: HtmlElement = source
            .clone_node_with_deep(true)
            .map_err(|e| StagingError::Mount(format!("{:?}", e)))?
            .dyn_into()
            .map_err(|_| StagingError::Mount(format!("'{}' is not an HTML element", source_id)))?;

        // The clone must not shadow the live preview in id lookups.
        element.remove_attribute("id").ok();
        mark(&element)?;
        park(&element, width_px, Some(height_px))?;

        self.body()?
            .append_child(&element)
            .map_err(|e| StagingError::Mount(format!("{:?}", e)))?;
        Ok(StagedElement {
            element,
            stylesheet: None,
        })
    }

    fn stage_markup(&self, markup: &StyledMarkup) -> Result<StagedElement, StagingError> {
        let head = self
            .document
            .head()
            .ok_or_else(|| StagingError::Mount("document has no <head>".to_string()))?;
        let body = self.body()?;

        let stylesheet = self.create("style")?;
        stylesheet.set_text_content(Some(&markup.stylesheet));

        let element: HtmlElement = self
            .create("div")?
            .dyn_into()
            .map_err(|_| StagingError::Mount("<div> is not an HTML element".to_string()))?;
        park(&element, markup.width_px, None)?;
        element.set_inner_html(&markup.html);

        head.append_child(&stylesheet)
            .map_err(|e| StagingError::Mount(format!("{:?}", e)))?;
        if let Err(e) = body.append_child(&element) {
            stylesheet.remove();
            return Err(StagingError::Mount(format!("{:?}", e)));
        }
        Ok(StagedElement {
            element,
            stylesheet: Some(stylesheet),
        })
    }

    fn release(&self, node: &StagedElement) {
        node.element.remove();
        if let Some(stylesheet) = &node.stylesheet {
            stylesheet.remove();
        }
    }
}
