use image::RgbaImage;
use std::path::Path;

use crate::error::{InvoiceError, Result};

/// A rendered invoice preview. Immutable once captured.
#[derive(Debug, Clone)]
pub struct SourceBitmap {
    pixels: RgbaImage,
}

impl SourceBitmap {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Read a rendered preview (PNG or JPEG) from disk
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(InvoiceError::RenderTargetMissing(path.to_path_buf()));
        }
        let decoded = image::open(path).map_err(|e| InvoiceError::Render(e.to_string()))?;
        log::debug!(
            "Decoded preview {} ({}x{} px)",
            path.display(),
            decoded.width(),
            decoded.height()
        );
        Ok(Self::new(decoded.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}
