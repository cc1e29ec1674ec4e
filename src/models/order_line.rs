use crate::models::json::{decimal_value, string_value, u32_value};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Snapshot of one cart line, frozen into the order at checkout.
///
/// Order line items never change after creation, even when catalogue prices
/// move later; they are copies, not references into the CMS.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub product_id: String,
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl OrderLine {
    /// Decodes one stored line. Prices tolerate the number-or-string duality
    /// of legacy rows; a missing line total is recomputed from unit price and
    /// quantity. Lines without a product id are dropped by the caller.
    pub fn from_stored(value: &Value) -> Option<Self> {
        let product_id = value.get("product_id").and_then(string_value)?;
        let product_name = value
            .get("product_name")
            .and_then(string_value)
            .unwrap_or_default();
        let variant_sku = value.get("variant_sku").and_then(string_value);
        let variant_name = value.get("variant_name").and_then(string_value);
        let quantity = value.get("quantity").and_then(u32_value).unwrap_or(1);
        let unit_price = value
            .get("unit_price")
            .and_then(decimal_value)
            .unwrap_or(Decimal::ZERO);
        let line_total = value
            .get("line_total")
            .and_then(decimal_value)
            .unwrap_or_else(|| unit_price * Decimal::from(quantity));

        Some(Self {
            product_id,
            product_name,
            variant_sku,
            variant_name,
            quantity,
            unit_price,
            line_total,
        })
    }

    /// Decodes the stored items column. Anything other than an array, and any
    /// unreadable element, degrades to fewer lines rather than a read error.
    pub fn list_from_stored(value: &Value) -> Vec<Self> {
        match value {
            Value::Array(entries) => entries.iter().filter_map(Self::from_stored).collect(),
            _ => Vec::new(),
        }
    }
}
