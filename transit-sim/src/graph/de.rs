//! Lenient field deserializers for raw network input.
//!
//! Upstream data mixes numbers and numeric strings, and sometimes carries
//! junk in optional fields. These helpers turn anything unusable into
//! `None` instead of failing the whole payload.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a number or a numeric string; anything else becomes `None`.
pub(super) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64))
}

/// Accept a string or a number (rendered as text); anything else becomes `None`.
pub(super) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn value_as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}
