mod edit;
mod fields;
mod item;

pub use edit::ScalarField;
pub use fields::{FieldToggles, OptionalField};
pub use item::LineItem;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{InvoiceError, Result};
use crate::storage::KeyValueStore;
use crate::totals::{self, TotalsFlags, TotalsResult};
use item::lenient_number;

/// Storage key the current invoice lives under
pub const CURRENT_INVOICE_KEY: &str = "currentInvoice";

pub const DEFAULT_TAX_RATE: f64 = 10.0;

pub const STANDARD_TERMS: &str = "Payment is due within 30 days of invoice date. \
Late payments may incur interest charges at 1.5% per month. \
All prices are in the specified currency and are non-refundable. \
Please include the invoice number with your payment. Thank you for your business.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Inr,
    Jpy,
    Aud,
    Cad,
}

impl Currency {
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Inr => "₹",
            Currency::Jpy => "¥",
            Currency::Aud => "A$",
            Currency::Cad => "C$",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Inr => "INR",
            Currency::Jpy => "JPY",
            Currency::Aud => "AUD",
            Currency::Cad => "CAD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "INR" => Ok(Currency::Inr),
            "JPY" => Ok(Currency::Jpy),
            "AUD" => Ok(Currency::Aud),
            "CAD" => Ok(Currency::Cad),
            _ => Err(InvoiceError::InvalidValue {
                field: "currency".to_string(),
                value: s.to_string(),
                reason: "expected one of USD, EUR, GBP, INR, JPY, AUD, CAD".to_string(),
            }),
        }
    }
}

/// Colour scheme of the exported PDF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfTheme {
    #[default]
    Dark,
    Light,
}

impl PdfTheme {
    /// Page background as RGBA
    pub fn background(self) -> [u8; 4] {
        match self {
            PdfTheme::Dark => [0x00, 0x00, 0x00, 0xff],
            PdfTheme::Light => [0xff, 0xff, 0xff, 0xff],
        }
    }
}

impl fmt::Display for PdfTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfTheme::Dark => f.write_str("dark"),
            PdfTheme::Light => f.write_str("light"),
        }
    }
}

impl FromStr for PdfTheme {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(PdfTheme::Dark),
            "light" => Ok(PdfTheme::Light),
            _ => Err(InvoiceError::InvalidValue {
                field: "theme".to_string(),
                value: s.to_string(),
                reason: "expected 'dark' or 'light'".to_string(),
            }),
        }
    }
}

/// The whole invoice form, persisted as one JSON blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvoiceDocument {
    pub company_name: String,
    pub company_address: String,
    pub company_website: String,
    pub company_email: String,
    pub company_phone: String,

    pub client_name: String,
    pub client_address: String,

    pub invoice_number: String,
    pub invoice_title: String,
    #[serde(deserialize_with = "lenient_date")]
    pub date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_date")]
    pub due_date: Option<DateTime<Utc>>,
    pub notes: String,
    #[serde(deserialize_with = "lenient_currency")]
    pub currency: Currency,

    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<LineItem>,
    /// Data URL of the uploaded logo
    pub logo: String,
    #[serde(deserialize_with = "lenient_number")]
    pub tax_rate: f64,
    /// Global discount in percent
    #[serde(deserialize_with = "lenient_number")]
    pub discount: f64,

    pub payment_method: String,
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
    pub routing_number: String,
    pub terms: String,

    pub active_fields: FieldToggles,
    #[serde(deserialize_with = "lenient_theme")]
    pub pdf_theme: PdfTheme,
}

impl Default for InvoiceDocument {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            company_address: String::new(),
            company_website: String::new(),
            company_email: String::new(),
            company_phone: String::new(),
            client_name: String::new(),
            client_address: String::new(),
            invoice_number: String::new(),
            invoice_title: String::new(),
            date: None,
            due_date: None,
            notes: String::new(),
            currency: Currency::default(),
            items: vec![LineItem::default()],
            logo: String::new(),
            tax_rate: DEFAULT_TAX_RATE,
            discount: 0.0,
            payment_method: String::new(),
            bank_name: String::new(),
            account_number: String::new(),
            account_name: String::new(),
            routing_number: String::new(),
            terms: String::new(),
            active_fields: FieldToggles::default(),
            pdf_theme: PdfTheme::default(),
        }
    }
}

fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_currency<'de, D>(deserializer: D) -> std::result::Result<Currency, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default())
}

fn lenient_theme<'de, D>(deserializer: D) -> std::result::Result<PdfTheme, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default())
}

impl InvoiceDocument {
    /// Load the saved invoice. A missing or unreadable blob means "no saved
    /// invoice" and yields `fallback`.
    pub fn load(store: &dyn KeyValueStore, fallback: InvoiceDocument) -> InvoiceDocument {
        let raw = match store.get(CURRENT_INVOICE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback,
            Err(e) => {
                log::warn!("Ignoring saved invoice: {e}");
                return fallback;
            }
        };

        match serde_json::from_str::<InvoiceDocument>(&raw) {
            Ok(mut doc) => {
                if doc.items.is_empty() {
                    doc.items.push(LineItem::default());
                }
                log::debug!("Loaded saved invoice with {} item(s)", doc.items.len());
                doc
            }
            Err(e) => {
                log::warn!("Ignoring saved invoice: {e}");
                fallback
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(self)?;
        store.set(CURRENT_INVOICE_KEY, &json)
    }

    pub fn is_enabled(&self, field: OptionalField) -> bool {
        self.active_fields.is_enabled(field)
    }

    /// Flip a field's visibility, resetting its values when it is hidden.
    /// Returns the new state.
    pub fn toggle(&mut self, field: OptionalField) -> bool {
        let enabled = !self.is_enabled(field);
        if !enabled {
            field.reset(self);
        }
        self.active_fields.set(field, enabled);
        enabled
    }

    /// Put every hidden field back to its default value
    pub fn reset_hidden_fields(&mut self) {
        let hidden: Vec<OptionalField> = self
            .active_fields
            .iter()
            .filter(|(_, enabled)| !enabled)
            .map(|(field, _)| field)
            .collect();
        for field in hidden {
            field.reset(self);
        }
    }

    pub fn totals(&self) -> TotalsResult {
        totals::calculate(
            &self.items,
            self.discount,
            self.tax_rate,
            TotalsFlags {
                tax_enabled: self.is_enabled(OptionalField::Tax),
                discount_enabled: self.is_enabled(OptionalField::Discount),
            },
        )
    }

    pub fn add_item(&mut self, item: LineItem) {
        self.items.push(item);
    }

    pub fn item_mut(&mut self, index: usize) -> Result<&mut LineItem> {
        let count = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(InvoiceError::InvalidItemIndex {
                index: index + 1,
                count,
            })
    }

    /// Remove an item. The last remaining item is kept; returns whether
    /// anything was removed.
    pub fn remove_item(&mut self, index: usize) -> Result<bool> {
        if index >= self.items.len() {
            return Err(InvoiceError::InvalidItemIndex {
                index: index + 1,
                count: self.items.len(),
            });
        }
        if self.items.len() == 1 {
            return Ok(false);
        }
        self.items.remove(index);
        Ok(true)
    }
}
