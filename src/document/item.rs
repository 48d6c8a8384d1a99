use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One billable row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    pub description: String,
    #[serde(deserialize_with = "lenient_number")]
    pub quantity: f64,
    /// `None` is the empty/unset price
    #[serde(deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    /// Item-level discount in percent
    #[serde(deserialize_with = "lenient_number")]
    pub discount: f64,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            description: String::new(),
            quantity: 1.0,
            price: None,
            discount: 0.0,
        }
    }
}

fn number_from_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Accept numbers, numeric strings, or anything else as 0
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).unwrap_or(0.0))
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}
