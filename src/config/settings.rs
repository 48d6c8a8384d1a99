use serde::{Deserialize, Serialize};

use crate::document::{Currency, InvoiceDocument, PdfTheme, DEFAULT_TAX_RATE};
use crate::export::PageGeometry;

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub page: PageGeometry,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExportSettings {
    /// Relative paths resolve against the config directory
    pub output_dir: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
        }
    }
}

/// Starting values for a fresh invoice
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Defaults {
    pub currency: Currency,
    pub tax_rate: f64,
    pub theme: PdfTheme,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            tax_rate: DEFAULT_TAX_RATE,
            theme: PdfTheme::default(),
        }
    }
}

impl Defaults {
    pub fn new_document(&self) -> InvoiceDocument {
        InvoiceDocument {
            currency: self.currency,
            tax_rate: self.tax_rate,
            pdf_theme: self.theme,
            ..InvoiceDocument::default()
        }
    }
}
