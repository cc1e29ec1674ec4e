//! Lenient readers for loosely-typed persisted JSON.
//!
//! Rows written by earlier storefront versions stored numbers either as JSON
//! numbers or as numeric strings. All coercion out of stored JSON goes
//! through these helpers so the tolerance lives in exactly one place.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Reads a decimal from a JSON number or numeric string.
pub fn decimal_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Reads a field from a JSON object as a decimal, falling back to `fallback`
/// when the field is absent or unreadable.
pub fn decimal_field(object: &Value, field: &str, fallback: Decimal) -> Decimal {
    object
        .get(field)
        .and_then(decimal_value)
        .unwrap_or(fallback)
}

/// Reads a non-negative integer from a JSON number or numeric string.
pub fn u32_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a string field, tolerating numeric ids.
pub fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
