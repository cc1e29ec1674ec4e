use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Product record as published by the CMS. Read-only from the storefront's
/// point of view; the pricing engine only depends on the price-bearing
/// fields below and ignores imagery/SEO metadata entirely.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub base_price: Decimal,
    /// Storefront-wide sale percentage, applied before tier evaluation
    #[serde(default)]
    pub discount: Option<Decimal>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub pricing_tiers: Vec<PricingTier>,
}

/// Product sub-selection (e.g. box size) carrying a signed price adjustment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub sku: String,
    pub name: String,
    /// Signed amount added to the base price
    #[serde(default, alias = "price_adjustment")]
    pub price_adjustment: Decimal,
    #[serde(default)]
    pub quantity_options: Vec<QuantityOption>,
}

/// Discrete named pack size. An option with an explicit per-unit price
/// overrides tier math entirely when selected. The synthetic `quantity == 1`
/// row is the unit-price display row and is never selectable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuantityOption {
    pub label: String,
    pub quantity: u32,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub price_per_unit: Option<Decimal>,
}

/// Quantity-range-keyed percentage discount on the adjusted base price.
///
/// A missing `discount` in the CMS payload decodes as 0 rather than failing
/// the product read; tier authoring mistakes must not take the storefront
/// down.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub min_quantity: u32,
    /// Open-ended when absent
    #[serde(default)]
    pub max_quantity: Option<u32>,
    /// Percentage in [0, 100]
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub label: Option<String>,
}
