//! Physical page geometry.
//!
//! Three unit systems meet here: millimetres (how page formats are defined),
//! PDF points (how documents are written) and reference pixels at 96 DPI
//! (how the staging node is sized before capture).

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// CSS reference resolution used to size staged nodes.
pub const REFERENCE_DPI: f32 = 96.0;

const MM_PER_INCH: f32 = 25.4;
const PT_PER_INCH: f32 = 72.0;

/// A portrait page format.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PageFormat {
    #[default]
    A4,
    Letter,
    Legal,
    Custom { width_mm: f32, height_mm: f32 },
}

impl Eq for PageFormat {}

impl Hash for PageFormat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            PageFormat::A4 => 0u8.hash(state),
            PageFormat::Letter => 1u8.hash(state),
            PageFormat::Legal => 2u8.hash(state),
            PageFormat::Custom { width_mm, height_mm } => {
                3u8.hash(state);
                width_mm.to_bits().hash(state);
                height_mm.to_bits().hash(state);
            }
        }
    }
}

impl PageFormat {
    /// Width and height in millimetres.
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PageFormat::A4 => (210.0, 297.0),
            PageFormat::Letter => (215.9, 279.4),
            PageFormat::Legal => (215.9, 355.6),
            PageFormat::Custom { width_mm, height_mm } => (*width_mm, *height_mm),
        }
    }

    /// Width and height in PDF points.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        (mm_to_pt(w), mm_to_pt(h))
    }

    /// Width and height in whole reference pixels, rounded to nearest.
    ///
    /// A4 comes out as 794×1123.
    pub fn reference_px(&self) -> (u32, u32) {
        let (w, h) = self.dimensions_mm();
        (mm_to_px(w).round() as u32, mm_to_px(h).round() as u32)
    }

    /// Parse a format name (e.g., "A4", "Letter", "Legal").
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageFormat::A4),
            "letter" => Ok(PageFormat::Letter),
            "legal" => Ok(PageFormat::Legal),
            other => Err(format!("Unknown page format: '{}'", other)),
        }
    }
}

pub fn mm_to_pt(mm: f32) -> f32 {
    mm / MM_PER_INCH * PT_PER_INCH
}

pub fn mm_to_px(mm: f32) -> f32 {
    mm / MM_PER_INCH * REFERENCE_DPI
}

impl Serialize for PageFormat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PageFormat::A4 => serializer.serialize_str("A4"),
            PageFormat::Letter => serializer.serialize_str("Letter"),
            PageFormat::Legal => serializer.serialize_str("Legal"),
            PageFormat::Custom { width_mm, height_mm } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("widthMm", width_mm)?;
                map.serialize_entry("heightMm", height_mm)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for PageFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PageFormatDef {
            Str(String),
            #[serde(rename_all = "camelCase")]
            Map { width_mm: f32, height_mm: f32 },
        }

        match PageFormatDef::deserialize(deserializer)? {
            PageFormatDef::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            PageFormatDef::Map { width_mm, height_mm } => {
                if width_mm <= 0.0 || height_mm <= 0.0 {
                    return Err(de::Error::custom("page dimensions must be positive"));
                }
                Ok(PageFormat::Custom { width_mm, height_mm })
            }
        }
    }
}

/// How flowing content is laid onto pages when a converted document is paginated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageLayout {
    pub format: PageFormat,
    pub margin_top_mm: f32,
    pub margin_bottom_mm: f32,
    /// Fraction of a page's content height searched upward for a blank band to break on.
    pub break_search_ratio: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            format: PageFormat::A4,
            margin_top_mm: 15.0,
            margin_bottom_mm: 15.0,
            break_search_ratio: 0.12,
        }
    }
}

impl PageLayout {
    /// Height of the printable band in millimetres, never below 1 mm.
    pub fn content_height_mm(&self) -> f32 {
        let (_, h) = self.format.dimensions_mm();
        (h - self.margin_top_mm - self.margin_bottom_mm).max(1.0)
    }
}
