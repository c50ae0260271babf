use crate::paginate::plan_slices;
use crate::writer::{PageTreeWriter, Placement};
use crate::xobject;
use coverpress_traits::{BuildError, DocumentBuilder, PaginatedDocument};
use coverpress_types::page::mm_to_pt;
use coverpress_types::{DataUri, PageDocument, PageFormat, PageLayout};
use image::DynamicImage;
use log::{debug, info};

/// A [`DocumentBuilder`] that writes image-only PDF pages with lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfDocumentBuilder;

impl LopdfDocumentBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentBuilder for LopdfDocumentBuilder {
    fn build_single_page(
        &self,
        image: &DataUri,
        format: PageFormat,
    ) -> Result<PageDocument, BuildError> {
        let xobject = xobject::from_data_uri(image)?;
        let (page_width, page_height) = format.dimensions_pt();
        debug!(
            "Placing {}x{}px image on a {:.2}x{:.2}pt page",
            xobject.width, xobject.height, page_width, page_height
        );

        let mut writer = PageTreeWriter::new();
        writer.add_image_page(
            xobject,
            (page_width, page_height),
            Placement {
                x: 0.0,
                y: 0.0,
                width: page_width,
                height: page_height,
            },
        )?;
        writer.finish()
    }

    fn build_blank_page(&self, format: PageFormat) -> Result<PageDocument, BuildError> {
        let mut writer = PageTreeWriter::new();
        writer.add_blank_page(format.dimensions_pt());
        writer.finish()
    }

    fn build_paginated(
        &self,
        image: &DataUri,
        layout: &PageLayout,
    ) -> Result<PaginatedDocument, BuildError> {
        let decoded = xobject::decode(image)?;
        let rgb = DynamicImage::ImageRgb8(xobject::flatten(&decoded));
        if rgb.width() == 0 || rgb.height() == 0 {
            return Err(BuildError::InvalidImage("raster is empty".to_string()));
        }

        let (page_width, page_height) = layout.format.dimensions_pt();
        let points_per_pixel = page_width / rgb.width() as f32;
        let content_height_pt = mm_to_pt(layout.content_height_mm());
        let slice_height = (content_height_pt / points_per_pixel).floor().max(1.0) as u32;
        let search_rows = (slice_height as f32 * layout.break_search_ratio.clamp(0.0, 1.0)) as u32;
        let top_pt = page_height - mm_to_pt(layout.margin_top_mm);

        let slices = plan_slices(&rgb.to_luma8(), slice_height, search_rows);

        let mut writer = PageTreeWriter::new();
        for rows in slices {
            let rows_high = rows.end - rows.start;
            let slice = rgb.crop_imm(0, rows.start, rgb.width(), rows_high).to_rgb8();
            let height_pt = rows_high as f32 * points_per_pixel;
            writer.add_image_page(
                xobject::from_rgb(&slice)?,
                (page_width, page_height),
                Placement {
                    x: 0.0,
                    y: top_pt - height_pt,
                    width: page_width,
                    height: height_pt,
                },
            )?;
        }

        let page_count = writer.page_count();
        info!(
            "Paginated {}x{}px raster into {} page(s)",
            rgb.width(),
            rgb.height(),
            page_count
        );
        Ok(PaginatedDocument {
            document: writer.finish()?,
            page_count,
        })
    }
}
