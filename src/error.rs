use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("Config directory not found at {0}. Run 'invoice-builder init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid item index '{index}' (invoice has {count} item(s))")]
    InvalidItemIndex { index: usize, count: usize },

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD (e.g., '2026-01-31')")]
    InvalidDate(String),

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Field '{0}' is disabled. Run 'invoice-builder toggle {0}' to enable it.")]
    FieldDisabled(String),

    #[error("Preview not found: {0}")]
    RenderTargetMissing(PathBuf),

    #[error("Rendered preview is empty ({width}x{height} px)")]
    EmptyRender { width: u32, height: u32 },

    #[error("Page geometry leaves no content area ({width_mm}mm x {height_mm}mm)")]
    InvalidGeometry { width_mm: f64, height_mm: f64 },

    #[error("Failed to render preview: {0}")]
    Render(String),

    #[error("Failed to generate PDF: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
