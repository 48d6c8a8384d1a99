use chrono::{NaiveDate, TimeZone, Utc};
use clap::ValueEnum;

use super::{InvoiceDocument, OptionalField};
use crate::error::{InvoiceError, Result};
use crate::totals::coerce_number;

/// Single-valued fields that can be set from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScalarField {
    CompanyName,
    CompanyAddress,
    CompanyWebsite,
    CompanyEmail,
    CompanyPhone,
    ClientName,
    ClientAddress,
    InvoiceNumber,
    InvoiceTitle,
    Date,
    DueDate,
    Notes,
    Currency,
    TaxRate,
    Discount,
    PaymentMethod,
    BankName,
    AccountNumber,
    AccountName,
    RoutingNumber,
    Terms,
    Theme,
}

impl ScalarField {
    /// The optional section this field belongs to, if any
    pub fn section(self) -> Option<OptionalField> {
        use ScalarField::*;
        match self {
            CompanyName => Some(OptionalField::CompanyName),
            CompanyAddress => Some(OptionalField::CompanyAddress),
            CompanyWebsite | CompanyEmail | CompanyPhone => Some(OptionalField::CompanyContact),
            ClientName => Some(OptionalField::ClientName),
            ClientAddress => Some(OptionalField::ClientAddress),
            InvoiceNumber => Some(OptionalField::InvoiceNumber),
            InvoiceTitle => Some(OptionalField::InvoiceTitle),
            Date => Some(OptionalField::Date),
            DueDate => Some(OptionalField::DueDate),
            Notes => Some(OptionalField::Notes),
            Currency => Some(OptionalField::Currency),
            TaxRate => Some(OptionalField::Tax),
            Discount => Some(OptionalField::Discount),
            PaymentMethod | BankName | AccountNumber | AccountName | RoutingNumber => {
                Some(OptionalField::Payment)
            }
            Terms => Some(OptionalField::Terms),
            Theme => None,
        }
    }
}

fn parse_date(value: &str) -> Result<Option<chrono::DateTime<Utc>>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| InvoiceError::InvalidDate(value.to_string()))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| InvoiceError::InvalidDate(value.to_string()))?;
    Ok(Some(Utc.from_utc_datetime(&midnight)))
}

impl InvoiceDocument {
    /// Set a field from its textual value. Numbers are coerced leniently;
    /// an empty date clears it.
    pub fn set_field(&mut self, field: ScalarField, value: &str) -> Result<()> {
        if let Some(section) = field.section() {
            if !self.is_enabled(section) {
                return Err(InvoiceError::FieldDisabled(section.cli_name()));
            }
        }

        let text = value.to_string();
        match field {
            ScalarField::CompanyName => self.company_name = text,
            ScalarField::CompanyAddress => self.company_address = text,
            ScalarField::CompanyWebsite => self.company_website = text,
            ScalarField::CompanyEmail => self.company_email = text,
            ScalarField::CompanyPhone => self.company_phone = text,
            ScalarField::ClientName => self.client_name = text,
            ScalarField::ClientAddress => self.client_address = text,
            ScalarField::InvoiceNumber => self.invoice_number = text,
            ScalarField::InvoiceTitle => self.invoice_title = text,
            ScalarField::Date => self.date = parse_date(value)?,
            ScalarField::DueDate => self.due_date = parse_date(value)?,
            ScalarField::Notes => self.notes = text,
            ScalarField::Currency => self.currency = value.parse()?,
            ScalarField::TaxRate => self.tax_rate = coerce_number(value),
            ScalarField::Discount => self.discount = coerce_number(value),
            ScalarField::PaymentMethod => self.payment_method = text,
            ScalarField::BankName => self.bank_name = text,
            ScalarField::AccountNumber => self.account_number = text,
            ScalarField::AccountName => self.account_name = text,
            ScalarField::RoutingNumber => self.routing_number = text,
            ScalarField::Terms => self.terms = text,
            ScalarField::Theme => self.pdf_theme = value.parse()?,
        }
        Ok(())
    }
}
