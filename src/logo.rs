use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use crate::error::Result;

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Read an image file into a `data:` URL
pub fn data_url_from_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(format!("data:{};base64,{}", mime_for(path), STANDARD.encode(bytes)))
}
