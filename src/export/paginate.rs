//! Slicing a rendered preview into page-sized strips.
//!
//! The bitmap is scaled to the page's content width. If the scaled height
//! fits the content area it becomes a single page; otherwise it is cut into
//! `ceil(scaled_height / content_height)` contiguous horizontal strips.
//! Strip pixel heights are derived from the *scaled image height* in
//! millimetres (`px_per_mm = height_px / img_height_mm`), never from the raw
//! page height, so no content is lost or repeated at page boundaries.

use image::{imageops, DynamicImage, Rgba, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

use super::bitmap::SourceBitmap;
use crate::error::{InvoiceError, Result};

/// Output page size and margin, in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
}

impl Default for PageGeometry {
    /// A4 portrait with a 5mm margin
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 5.0,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f64 {
        self.width_mm - 2.0 * self.margin_mm
    }

    pub fn content_height(&self) -> f64 {
        self.height_mm - 2.0 * self.margin_mm
    }
}

/// Where one strip of the source comes from and where it lands on its page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice {
    pub index: usize,
    pub source_y_px: u32,
    pub height_px: u32,
    /// Offset of the image from the page's top-left corner
    pub x_mm: f64,
    pub y_mm: f64,
    pub placement_width_mm: f64,
    pub placement_height_mm: f64,
}

/// One output page: the cropped strip and its placement
#[derive(Debug, Clone)]
pub struct PageImage {
    pub slice: PageSlice,
    pub pixels: RgbImage,
}

impl PageImage {
    pub fn width_px(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height_px(&self) -> u32 {
        self.pixels.height()
    }
}

/// Compute the page strips for a `width_px` x `height_px` bitmap.
///
/// Strips are returned in page order, start at increasing source offsets,
/// and their heights sum to `height_px` exactly.
pub fn plan_pages(width_px: u32, height_px: u32, geometry: &PageGeometry) -> Result<Vec<PageSlice>> {
    let content_width = geometry.content_width();
    let content_height = geometry.content_height();
    if !(content_width > 0.0 && content_height > 0.0) {
        return Err(InvoiceError::InvalidGeometry {
            width_mm: content_width,
            height_mm: content_height,
        });
    }
    if width_px == 0 || height_px == 0 {
        return Err(InvoiceError::EmptyRender {
            width: width_px,
            height: height_px,
        });
    }

    // content_width / (width / height)
    let img_height = content_width * f64::from(height_px) / f64::from(width_px);
    let margin = geometry.margin_mm;

    if img_height <= content_height {
        return Ok(vec![PageSlice {
            index: 0,
            source_y_px: 0,
            height_px,
            x_mm: margin,
            y_mm: margin,
            placement_width_mm: content_width,
            placement_height_mm: img_height,
        }]);
    }

    // Never more pages than pixel rows, so every strip is at least 1px
    let page_count = ((img_height / content_height).ceil() as u64).min(u64::from(height_px));
    let px_per_mm = f64::from(height_px) / img_height;
    let boundary = |i: u64| (i * u64::from(height_px) / page_count) as u32;

    let slices = (0..page_count)
        .map(|i| {
            let start = boundary(i);
            let end = if i + 1 == page_count {
                height_px
            } else {
                boundary(i + 1)
            };
            let strip = end - start;

            PageSlice {
                index: i as usize,
                source_y_px: start,
                height_px: strip,
                x_mm: margin,
                y_mm: margin,
                placement_width_mm: content_width,
                placement_height_mm: (f64::from(strip) / px_per_mm).min(content_height),
            }
        })
        .collect();

    Ok(slices)
}

/// Cut a rendered preview into page images.
///
/// Each strip is drawn onto a canvas pre-filled with `background`, so
/// transparent regions come out in the page colour rather than black.
pub fn paginate(
    bitmap: &SourceBitmap,
    geometry: &PageGeometry,
    background: [u8; 4],
) -> Result<Vec<PageImage>> {
    let slices = plan_pages(bitmap.width(), bitmap.height(), geometry)?;
    if slices.len() > 1 {
        log::info!("Pages needed: {}", slices.len());
    }

    let width = bitmap.width();
    let pages = slices
        .into_iter()
        .map(|slice| {
            let mut canvas = RgbaImage::from_pixel(width, slice.height_px, Rgba(background));
            let strip =
                imageops::crop_imm(bitmap.pixels(), 0, slice.source_y_px, width, slice.height_px)
                    .to_image();
            imageops::overlay(&mut canvas, &strip, 0, 0);

            PageImage {
                slice,
                pixels: DynamicImage::ImageRgba8(canvas).into_rgb8(),
            }
        })
        .collect();

    Ok(pages)
}
