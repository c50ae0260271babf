use lopdf::Document as LopdfDocument;
use lopdf::Object;

/// Text drawn on one page (1-based), empty if it cannot be decoded.
pub fn page_text(doc: &LopdfDocument, page_num: u32) -> String {
    doc.extract_text(&[page_num]).unwrap_or_default()
}

/// Get page dimensions (width, height) in points
pub fn get_page_dimensions(doc: &LopdfDocument, page_num: u32) -> Option<(f32, f32)> {
    let pages = doc.get_pages();
    let page_id = pages.get(&page_num)?;
    let page_dict = doc.get_dictionary(*page_id).ok()?;
    let arr = page_dict.get(b"MediaBox").ok()?.as_array().ok()?;
    if arr.len() < 4 {
        return None;
    }
    let width = number(&arr[2])? - number(&arr[0])?;
    let height = number(&arr[3])? - number(&arr[1])?;
    Some((width, height))
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Number of image XObjects a page's own resources declare.
pub fn count_page_images(doc: &LopdfDocument, page_num: u32) -> usize {
    let pages = doc.get_pages();
    let Some(page_id) = pages.get(&page_num) else {
        return 0;
    };
    let Ok(page) = doc.get_dictionary(*page_id) else {
        return 0;
    };
    let resources = match page.get(b"Resources") {
        Ok(Object::Reference(id)) => doc.get_dictionary(*id).ok(),
        Ok(Object::Dictionary(dict)) => Some(dict),
        _ => None,
    };
    let xobjects = resources.and_then(|r| match r.get(b"XObject") {
        Ok(Object::Reference(id)) => doc.get_dictionary(*id).ok(),
        Ok(Object::Dictionary(dict)) => Some(dict),
        _ => None,
    });
    let Some(xobjects) = xobjects else {
        return 0;
    };
    xobjects
        .iter()
        .filter_map(|(_, value)| value.as_reference().ok())
        .filter_map(|id| doc.get_object(id).ok())
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|stream| {
            stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .map(|name| name == b"Image")
                .unwrap_or(false)
        })
        .count()
}

// ============================================================================
// Fluent Assertion Macros
// ============================================================================

/// Assert that a page of the PDF contains specific text
#[macro_export]
macro_rules! assert_page_contains_text {
    ($pdf:expr, $page:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::page_text(&$pdf.doc, $page);
        assert!(
            extracted.contains($text),
            "Page {} should contain '{}', but extracted text was:\n{}",
            $page,
            $text,
            extracted
        );
    };
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

/// Assert that a page is drawn from exactly one image
#[macro_export]
macro_rules! assert_page_is_image {
    ($pdf:expr, $page:expr) => {
        assert_eq!(
            $crate::common::pdf_assertions::count_page_images(&$pdf.doc, $page),
            1,
            "Page {} should carry exactly one image",
            $page
        );
    };
}

/// Assert page dimensions within tolerance
#[macro_export]
macro_rules! assert_pdf_page_size {
    ($pdf:expr, $page:expr, $width:expr, $height:expr) => {
        let dims = $crate::common::pdf_assertions::get_page_dimensions(&$pdf.doc, $page);
        assert!(dims.is_some(), "Could not get dimensions for page {}", $page);
        let (w, h) = dims.unwrap();
        assert!(
            (w - $width).abs() < 1.0,
            "Page {} width expected ~{}, got {}",
            $page,
            $width,
            w
        );
        assert!(
            (h - $height).abs() < 1.0,
            "Page {} height expected ~{}, got {}",
            $page,
            $height,
            h
        );
    };
}
