use serde::Serialize;

use crate::document::LineItem;

/// Which optional sections take part in the calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalsFlags {
    pub tax_enabled: bool,
    pub discount_enabled: bool,
}

/// Derived invoice totals. Never stored; recompute from the document.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TotalsResult {
    pub subtotal: f64,
    pub total_discount: f64,
    pub tax: f64,
    pub grand_total: f64,
}

/// Per-row amounts shown in the items table
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineTotals {
    pub gross: f64,
    pub discount: f64,
    pub net: f64,
}

/// Parse user input as a number. Anything unusable becomes 0.
pub fn coerce_number(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// quantity x price, with a missing price counted as 0
pub fn line_amount(item: &LineItem) -> f64 {
    item.quantity * item.price.unwrap_or(0.0)
}

pub fn line_totals(item: &LineItem, discount_enabled: bool) -> LineTotals {
    let gross = line_amount(item);
    let discount = if discount_enabled {
        gross * (item.discount / 100.0)
    } else {
        0.0
    };

    LineTotals {
        gross,
        discount,
        net: gross - discount,
    }
}

/// Compute subtotal, discount, tax and grand total.
///
/// Item-level discounts are suppressed (not summed) when the discount
/// section is disabled. Tax applies to the amount after discount.
pub fn calculate(
    items: &[LineItem],
    global_discount_percent: f64,
    tax_rate_percent: f64,
    flags: TotalsFlags,
) -> TotalsResult {
    let subtotal: f64 = items.iter().map(line_amount).sum();

    let total_discount = if flags.discount_enabled {
        let per_item: f64 = items
            .iter()
            .map(|item| line_amount(item) * (item.discount / 100.0))
            .sum();
        per_item + subtotal * global_discount_percent / 100.0
    } else {
        0.0
    };

    let after_discount = subtotal - total_discount;
    let tax = if flags.tax_enabled {
        after_discount * (tax_rate_percent / 100.0)
    } else {
        0.0
    };

    TotalsResult {
        subtotal,
        total_discount,
        tax,
        grand_total: after_discount + tax,
    }
}

/// Format an amount for display, e.g. `$1,234.50`
pub fn format_money(value: f64, symbol: &str) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{frac:02}")
}
