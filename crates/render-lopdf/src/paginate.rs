//! Cutting a tall raster into page-sized slices.
//!
//! The raster has no notion of lines or boxes, so "text-safe" here means a
//! band of rows that is entirely background. Cutting inside such a band can
//! never split a glyph, a table rule or an image.

use image::GrayImage;
use std::ops::Range;

/// Rows whose every pixel is at least this bright count as background.
pub const BLANK_LUMA_THRESHOLD: u8 = 245;

/// Marks which rows of `image` are entirely background.
pub fn blank_rows(image: &GrayImage) -> Vec<bool> {
    image
        .rows()
        .map(|mut row| row.all(|p| p.0[0] >= BLANK_LUMA_THRESHOLD))
        .collect()
}

/// Splits `image` into row ranges no taller than `slice_height`.
///
/// Each cut is placed in the middle of the blank band nearest above the
/// nominal cut, looking at most `search_rows` rows up. Without such a band
/// the cut falls at the nominal row. Trailing slices that are entirely
/// blank are dropped, but at least one slice is always returned.
pub fn plan_slices(image: &GrayImage, slice_height: u32, search_rows: u32) -> Vec<Range<u32>> {
    let height = image.height();
    let slice_height = slice_height.max(1);
    if height == 0 {
        return vec![0..0];
    }

    let blank = blank_rows(image);
    let mut slices = Vec::new();
    let mut start = 0;

    while start < height {
        let nominal = start + slice_height;
        if nominal >= height {
            slices.push(start..height);
            break;
        }
        let lower = nominal.saturating_sub(search_rows).max(start + 1);
        let cut = find_break(&blank, lower, nominal).unwrap_or(nominal);
        slices.push(start..cut);
        start = cut;
    }

    while slices.len() > 1 {
        let last = slices.last().cloned().unwrap_or(0..0);
        if last.clone().all(|row| blank[row as usize]) {
            slices.pop();
        } else {
            break;
        }
    }

    log::debug!(
        "Planned {} slice(s) for a {}px raster at {}px per page",
        slices.len(),
        height,
        slice_height
    );
    slices
}

/// Scans upward from `nominal` to `lower` (inclusive) for the nearest blank
/// row and returns the middle of the blank band it belongs to, clamped to
/// the scanned window.
fn find_break(blank: &[bool], lower: u32, nominal: u32) -> Option<u32> {
    let hit = (lower..=nominal).rev().find(|&row| blank[row as usize])?;

    let mut band_start = hit;
    while band_start > lower && blank[band_start as usize - 1] {
        band_start -= 1;
    }
    Some(band_start + (hit - band_start + 1) / 2)
}
