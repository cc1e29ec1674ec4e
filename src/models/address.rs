use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Postal address attached to an order.
///
/// Every field is a plain string and the default value is the fully-populated
/// empty-string object: rendering code downstream never has to null-check a
/// sub-field, even for legacy rows persisted without an address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub county: String,
    pub postcode: String,
    pub country: String,
    pub phone: String,
}

impl Address {
    /// Decodes a stored address column. A missing column or an undecodable
    /// value yields the empty address rather than an error.
    pub fn from_stored(value: Option<&Value>) -> Self {
        value
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    /// Display name, empty when the address carries no name at all.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_empty(&self) -> bool {
        self == &Address::default()
    }
}
