use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::{Currency, InvoiceDocument, DEFAULT_TAX_RATE};

/// Sections the user may show or hide
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "camelCase")]
pub enum OptionalField {
    CompanyName,
    CompanyAddress,
    CompanyContact,
    ClientName,
    ClientAddress,
    InvoiceNumber,
    InvoiceTitle,
    Currency,
    Date,
    DueDate,
    Notes,
    Logo,
    Tax,
    Discount,
    Payment,
    Terms,
}

type ResetAction = fn(&mut InvoiceDocument);

/// What disabling each field does to the stored values
const RESET_TABLE: &[(OptionalField, ResetAction)] = &[
    (OptionalField::CompanyName, |doc| doc.company_name.clear()),
    (OptionalField::CompanyAddress, |doc| doc.company_address.clear()),
    (OptionalField::CompanyContact, |doc| {
        doc.company_website.clear();
        doc.company_email.clear();
        doc.company_phone.clear();
    }),
    (OptionalField::ClientName, |doc| doc.client_name.clear()),
    (OptionalField::ClientAddress, |doc| doc.client_address.clear()),
    (OptionalField::InvoiceNumber, |doc| doc.invoice_number.clear()),
    (OptionalField::InvoiceTitle, |doc| doc.invoice_title.clear()),
    (OptionalField::Currency, |doc| doc.currency = Currency::Usd),
    (OptionalField::Date, |doc| doc.date = None),
    (OptionalField::DueDate, |doc| doc.due_date = None),
    (OptionalField::Notes, |doc| doc.notes.clear()),
    (OptionalField::Logo, |doc| doc.logo.clear()),
    (OptionalField::Tax, |doc| doc.tax_rate = DEFAULT_TAX_RATE),
    (OptionalField::Discount, |doc| doc.discount = 0.0),
    (OptionalField::Payment, |doc| {
        doc.payment_method.clear();
        doc.bank_name.clear();
        doc.account_number.clear();
        doc.account_name.clear();
        doc.routing_number.clear();
    }),
    (OptionalField::Terms, |doc| doc.terms.clear()),
];

impl OptionalField {
    pub const ALL: [OptionalField; 16] = [
        OptionalField::CompanyName,
        OptionalField::CompanyAddress,
        OptionalField::CompanyContact,
        OptionalField::ClientName,
        OptionalField::ClientAddress,
        OptionalField::InvoiceNumber,
        OptionalField::InvoiceTitle,
        OptionalField::Currency,
        OptionalField::Date,
        OptionalField::DueDate,
        OptionalField::Notes,
        OptionalField::Logo,
        OptionalField::Tax,
        OptionalField::Discount,
        OptionalField::Payment,
        OptionalField::Terms,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OptionalField::CompanyName => "Company Name",
            OptionalField::CompanyAddress => "Company Address",
            OptionalField::CompanyContact => "Contact Info",
            OptionalField::ClientName => "Client Name",
            OptionalField::ClientAddress => "Client Address",
            OptionalField::InvoiceNumber => "Invoice Number",
            OptionalField::InvoiceTitle => "Invoice Title",
            OptionalField::Currency => "Currency",
            OptionalField::Date => "Date",
            OptionalField::DueDate => "Due Date",
            OptionalField::Notes => "Notes",
            OptionalField::Logo => "Logo",
            OptionalField::Tax => "Tax/GST",
            OptionalField::Discount => "Discount",
            OptionalField::Payment => "Payment Info",
            OptionalField::Terms => "Terms",
        }
    }

    /// The name used on the command line, e.g. `company-contact`
    pub fn cli_name(self) -> String {
        self.to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_else(|| format!("{self:?}"))
    }

    /// Reset this field's values to their defaults
    pub fn reset(self, doc: &mut InvoiceDocument) {
        for (field, action) in RESET_TABLE {
            if *field == self {
                action(doc);
            }
        }
    }
}

/// Visibility of each optional field. Missing entries are enabled.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct FieldToggles(BTreeMap<OptionalField, bool>);

impl FieldToggles {
    pub fn is_enabled(&self, field: OptionalField) -> bool {
        self.0.get(&field).copied().unwrap_or(true)
    }

    pub fn set(&mut self, field: OptionalField, enabled: bool) {
        self.0.insert(field, enabled);
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionalField, bool)> + '_ {
        OptionalField::ALL
            .into_iter()
            .map(move |field| (field, self.is_enabled(field)))
    }
}

impl<'de> Deserialize<'de> for FieldToggles {
    // Unknown keys are dropped instead of failing the whole document; null
    // means no saved toggles
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?
            .unwrap_or_default();
        let mut toggles = BTreeMap::new();
        for (key, value) in raw {
            let field = serde_json::from_value::<OptionalField>(serde_json::Value::String(key));
            if let (Ok(field), Some(enabled)) = (field, value.as_bool()) {
                toggles.insert(field, enabled);
            }
        }
        Ok(FieldToggles(toggles))
    }
}
