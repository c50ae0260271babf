//! Image XObjects built from captured bitmaps.

use coverpress_traits::BuildError;
use coverpress_types::DataUri;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{DynamicImage, ImageFormat, RgbImage};
use lopdf::{Stream, dictionary};
use std::io::Write;

/// An image stream ready to be added to a document, with its pixel size.
pub(crate) struct ImageXObject {
    pub width: u32,
    pub height: u32,
    pub stream: Stream,
}

/// Decodes a PNG or JPEG data URI.
pub(crate) fn decode(uri: &DataUri) -> Result<DynamicImage, BuildError> {
    let format = format_for(uri.mime_type())?;
    image::load_from_memory_with_format(uri.data(), format)
        .map_err(|e| BuildError::InvalidImage(e.to_string()))
}

/// Builds an XObject for the data URI. JPEG payloads pass through untouched;
/// everything else is re-encoded as flattened RGB.
pub(crate) fn from_data_uri(uri: &DataUri) -> Result<ImageXObject, BuildError> {
    let decoded = decode(uri)?;
    if format_for(uri.mime_type())? == ImageFormat::Jpeg {
        let color_space = match decoded {
            DynamicImage::ImageLuma8(_) => "DeviceGray",
            _ => "DeviceRGB",
        };
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => decoded.width() as i64,
            "Height" => decoded.height() as i64,
            "ColorSpace" => color_space,
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        };
        return Ok(ImageXObject {
            width: decoded.width(),
            height: decoded.height(),
            stream: Stream::new(dict, uri.data().to_vec()),
        });
    }
    from_rgb(&flatten(&decoded))
}

/// Composites any alpha channel onto white. Canvas captures are often
/// transparent outside painted areas, and PDF viewers would show black there.
pub(crate) fn flatten(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |c: u8| -> u8 {
            let a = a as u16;
            ((c as u16 * a + 255 * (255 - a)) / 255) as u8
        };
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

pub(crate) fn from_rgb(rgb: &RgbImage) -> Result<ImageXObject, BuildError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(rgb.as_raw())
        .map_err(|e| BuildError::Pdf(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| BuildError::Pdf(e.to_string()))?;

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => rgb.width() as i64,
        "Height" => rgb.height() as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };
    Ok(ImageXObject {
        width: rgb.width(),
        height: rgb.height(),
        stream: Stream::new(dict, compressed),
    })
}

fn format_for(mime_type: &str) -> Result<ImageFormat, BuildError> {
    match mime_type {
        "image/png" => Ok(ImageFormat::Png),
        "image/jpeg" | "image/jpg" => Ok(ImageFormat::Jpeg),
        other => Err(BuildError::UnsupportedImage(other.to_string())),
    }
}
