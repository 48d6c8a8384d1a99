pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod logger;
pub mod logo;
pub mod storage;
pub mod totals;

pub use config::{Config, Defaults};
pub use document::{Currency, InvoiceDocument, LineItem, OptionalField, PdfTheme, ScalarField};
pub use error::{InvoiceError, Result};
pub use export::{export_invoice, paginate, plan_pages, PageGeometry, PageImage, SourceBitmap};
pub use storage::{FileStore, KeyValueStore};
pub use totals::{calculate, TotalsFlags, TotalsResult};
