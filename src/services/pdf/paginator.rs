//! Slicing a tall capture into page-sized segments and writing them as PDF pages.

use anyhow::Context;
use printpdf::{
    ColorBits, ColorSpace, Image, ImageFilter, ImageTransform, ImageXObject, Mm, PdfDocument, Px,
};
use std::io::BufWriter;

use super::error::ExportError;
use super::raster::{encode_jpeg, Capture};
use crate::models::settings::ExportSettings;

const MM_PER_INCH: f32 = 25.4;

/// Page geometry in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
}

impl PageLayout {
    pub fn from_settings(settings: &ExportSettings) -> Self {
        Self {
            page_width_mm: settings.page_width_mm,
            page_height_mm: settings.page_height_mm,
            margin_mm: settings.margin_mm,
        }
    }

    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - self.margin_mm * 2.0
    }

    pub fn content_height_mm(&self) -> f32 {
        self.page_height_mm - self.margin_mm * 2.0
    }

    /// Bitmap rows that fit on one page once `width_px` is scaled to the content width
    pub fn rows_per_page(&self, width_px: u32) -> u32 {
        let rows = self.content_height_mm() * width_px as f32 / self.content_width_mm();
        (rows.floor() as u32).max(1)
    }

    pub fn rows_to_mm(&self, rows: u32, width_px: u32) -> f32 {
        rows as f32 * self.content_width_mm() / width_px.max(1) as f32
    }

    /// Resolution that maps `width_px` onto the content width
    pub fn dpi_for(&self, width_px: u32) -> f32 {
        width_px as f32 * MM_PER_INCH / self.content_width_mm()
    }
}

/// A contiguous band of bitmap rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub y: u32,
    pub height: u32,
}

/// Consecutive slices of at most `rows_per_page` rows covering `total_rows` exactly
pub fn plan_slices(total_rows: u32, rows_per_page: u32) -> Vec<Slice> {
    let rows_per_page = rows_per_page.max(1);
    let mut slices = Vec::with_capacity(total_rows.div_ceil(rows_per_page) as usize);
    let mut y = 0;
    while y < total_rows {
        let height = rows_per_page.min(total_rows - y);
        slices.push(Slice { y, height });
        y += height;
    }
    slices
}

/// Finished PDF bytes
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

pub struct PageWriter<'a> {
    settings: &'a ExportSettings,
    layout: PageLayout,
}

impl<'a> PageWriter<'a> {
    pub fn new(settings: &'a ExportSettings) -> Self {
        Self {
            settings,
            layout: PageLayout::from_settings(settings),
        }
    }

    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    /// Write one page per slice of `capture`
    pub fn write(&self, capture: &Capture, title: &str) -> Result<RenderedPdf, ExportError> {
        let width = capture.width();
        let slices = plan_slices(capture.height(), self.layout.rows_per_page(width));
        if width == 0 || slices.is_empty() {
            return Err(ExportError::EmptyCapture);
        }

        let page_w = Mm(self.layout.page_width_mm);
        let page_h = Mm(self.layout.page_height_mm);
        let (doc, first_page, first_layer) = PdfDocument::new(title, page_w, page_h, "Layer 1");
        let dpi = self.layout.dpi_for(width);

        for (index, slice) in slices.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(page_w, page_h, "Layer 1")
            };
            let layer = doc.get_page(page).get_layer(layer);

            // A single page reuses the capture encoding as-is
            let jpeg = if slices.len() == 1 {
                capture.encode_jpeg(self.settings.capture_quality)?
            } else {
                encode_jpeg(&capture.rows(slice.y, slice.height), self.settings.page_quality)?
            };

            let image = Image::from(ImageXObject {
                width: Px(width as usize),
                height: Px(slice.height as usize),
                color_space: ColorSpace::Rgb,
                bits_per_component: ColorBits::Bit8,
                interpolate: true,
                image_data: jpeg,
                image_filter: Some(ImageFilter::DCT),
                smask: None,
                clipping_bbox: None,
            });

            let slice_mm = self.layout.rows_to_mm(slice.height, width);
            image.add_to_layer(
                layer,
                ImageTransform {
                    translate_x: Some(Mm(self.layout.margin_mm)),
                    translate_y: Some(Mm(
                        self.layout.page_height_mm - self.layout.margin_mm - slice_mm,
                    )),
                    dpi: Some(dpi),
                    ..Default::default()
                },
            );
        }

        let mut writer = BufWriter::new(Vec::new());
        doc.save(&mut writer)
            .context("Failed to save PDF")
            .map_err(ExportError::Pdf)?;
        let bytes = writer
            .into_inner()
            .context("Failed to flush PDF buffer")
            .map_err(ExportError::Pdf)?;

        Ok(RenderedPdf {
            bytes,
            page_count: slices.len(),
        })
    }
}
