use printpdf::*;

use super::paginate::{PageGeometry, PageImage};
use crate::error::{InvoiceError, Result};

// Images are embedded at 72 dpi so one pixel starts out as one point
const IMAGE_DPI: f32 = 72.0;

/// Build a PDF with one page per page image, in the given order.
pub fn assemble_pdf(pages: &[PageImage], geometry: &PageGeometry, title: &str) -> Result<Vec<u8>> {
    if pages.is_empty() {
        return Err(InvoiceError::Pdf("no pages to write".to_string()));
    }

    let mut doc = PdfDocument::new(title);
    let page_width_pt = Mm(geometry.width_mm as f32).into_pt();
    let page_height_pt = Mm(geometry.height_mm as f32).into_pt();
    let page_box = Rect {
        x: Pt(0.0),
        y: Pt(0.0),
        width: page_width_pt,
        height: page_height_pt,
    };

    for page in pages {
        let slice = &page.slice;
        let image = RawImage {
            pixels: RawImageData::U8(page.pixels.as_raw().clone()),
            width: page.width_px() as usize,
            height: page.height_px() as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let image_id = doc.add_image(&image);

        let target_width = Mm(slice.placement_width_mm as f32).into_pt();
        let target_height = Mm(slice.placement_height_mm as f32).into_pt();
        // PDF space grows upwards from the bottom-left corner
        let bottom_mm = geometry.height_mm - slice.y_mm - slice.placement_height_mm;

        let ops = vec![Op::UseXobject {
            id: image_id,
            transform: XObjectTransform {
                translate_x: Some(Mm(slice.x_mm as f32).into_pt()),
                translate_y: Some(Mm(bottom_mm as f32).into_pt()),
                rotate: None,
                scale_x: Some(target_width.0 / page.width_px() as f32),
                scale_y: Some(target_height.0 / page.height_px() as f32),
                dpi: Some(IMAGE_DPI),
            },
        }];

        doc.pages.push(PdfPage {
            media_box: page_box.clone(),
            trim_box: page_box.clone(),
            crop_box: page_box.clone(),
            ops,
        });
    }

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    for warning in &warnings {
        log::debug!("PDF writer: {warning:?}");
    }

    Ok(bytes)
}
