mod bitmap;
mod paginate;
mod pdf;

pub use bitmap::SourceBitmap;
pub use paginate::{paginate, plan_pages, PageGeometry, PageImage, PageSlice};
pub use pdf::assemble_pdf;

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::document::{InvoiceDocument, OptionalField};
use crate::error::Result;

/// Result of a successful export
#[derive(Debug)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub pages: usize,
}

/// `invoice-<unix millis>.pdf`
pub fn default_filename(now: DateTime<Utc>) -> String {
    format!("invoice-{}.pdf", now.timestamp_millis())
}

/// Paginate a rendered preview of `doc` and write it as a PDF.
pub fn export_invoice(
    doc: &InvoiceDocument,
    preview: &Path,
    geometry: &PageGeometry,
    output_path: &Path,
) -> Result<ExportSummary> {
    let bitmap = SourceBitmap::open(preview)?;
    log::info!("Canvas dimensions: {} x {}", bitmap.width(), bitmap.height());

    let pages = paginate(&bitmap, geometry, doc.pdf_theme.background())?;

    let title = if doc.is_enabled(OptionalField::InvoiceTitle) && !doc.invoice_title.is_empty() {
        doc.invoice_title.as_str()
    } else {
        "Invoice"
    };
    let bytes = assemble_pdf(&pages, geometry, title)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, bytes)?;

    Ok(ExportSummary {
        path: output_path.to_path_buf(),
        pages: pages.len(),
    })
}
