//! Pure pricing computation for a (product, variant, quantity) triple.
//!
//! Three strategies, in priority order:
//! 1. a selected quantity option with an explicit per-unit price is used
//!    verbatim;
//! 2. otherwise the matching pricing tier discounts the adjusted base price;
//! 3. otherwise the adjusted base price applies flat.
//!
//! Everything here is a pure function of its inputs and safe to call on
//! every UI state change.

use crate::catalog::selection;
use crate::catalog::types::{PricingTier, Product, QuantityOption, Variant};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const PERCENT: Decimal = dec!(100);

/// Which strategy priced a quote.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PriceStrategy {
    OptionOverride,
    TierDiscount,
    Flat,
}

/// Result of a pricing computation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceQuote {
    /// Quantity actually priced, after clamping to the minimum
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total: Decimal,
    /// Amount saved against the flat adjusted price, never negative
    pub savings: Decimal,
    pub strategy: PriceStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier_label: Option<String>,
}

/// Base price plus the variant's signed adjustment, with any product-level
/// sale percentage applied. Never negative.
pub fn adjusted_base_price(product: &Product, variant: Option<&Variant>) -> Decimal {
    let adjustment = variant.map(|v| v.price_adjustment).unwrap_or(Decimal::ZERO);
    let mut price = product.base_price + adjustment;
    if let Some(discount) = product.discount.filter(|d| *d > Decimal::ZERO) {
        price *= Decimal::ONE - clamp_percentage(discount) / PERCENT;
    }
    price.max(Decimal::ZERO)
}

/// Floor quantity for a variant: the smallest selectable pack size, or 1 when
/// the variant offers no packs.
pub fn minimum_quantity(variant: Option<&Variant>) -> u32 {
    variant
        .and_then(|v| selection::selectable_options(v).first().map(|o| o.quantity))
        .unwrap_or(1)
}

/// Total units priced when a pack option is selected: the pack size plus any
/// extra units the buyer added on top.
pub fn effective_quantity(option: &QuantityOption, extra_units: u32) -> u32 {
    option.quantity.saturating_add(extra_units)
}

/// Finds the tier governing `quantity`: highest `min_quantity` that still
/// qualifies, range inclusive on both ends, open-ended when `max_quantity`
/// is absent. Overlapping ranges resolve in favour of the higher floor.
pub fn match_tier(tiers: &[PricingTier], quantity: u32) -> Option<&PricingTier> {
    let mut sorted: Vec<&PricingTier> = tiers.iter().collect();
    sorted.sort_by(|a, b| b.min_quantity.cmp(&a.min_quantity));
    sorted.into_iter().find(|tier| {
        quantity >= tier.min_quantity && tier.max_quantity.map_or(true, |max| quantity <= max)
    })
}

/// Prices `requested_quantity` units of the product/variant, honouring a
/// selected pack option. Quantities below the variant's floor are silently
/// raised to it — you can't order less than the minimum pack.
pub fn quote(
    product: &Product,
    variant: Option<&Variant>,
    selected_option: Option<&QuantityOption>,
    requested_quantity: u32,
) -> PriceQuote {
    let quantity = requested_quantity.max(minimum_quantity(variant)).max(1);
    let flat_unit = adjusted_base_price(product, variant);

    let (unit_price, strategy, tier_label) = match selected_option
        .and_then(|o| o.price_per_unit)
        .filter(|p| *p > Decimal::ZERO)
    {
        Some(option_price) => (option_price, PriceStrategy::OptionOverride, None),
        None => match match_tier(&product.pricing_tiers, quantity)
            .filter(|tier| tier.discount > Decimal::ZERO)
        {
            Some(tier) => (
                flat_unit * (Decimal::ONE - clamp_percentage(tier.discount) / PERCENT),
                PriceStrategy::TierDiscount,
                tier.label.clone(),
            ),
            None => (flat_unit, PriceStrategy::Flat, None),
        },
    };

    let unit_price = unit_price.max(Decimal::ZERO);
    let quantity_dec = Decimal::from(quantity);
    let total = unit_price * quantity_dec;
    let savings = (flat_unit * quantity_dec - total).max(Decimal::ZERO);

    PriceQuote {
        quantity,
        unit_price,
        total,
        savings,
        strategy,
        tier_label,
    }
}

fn clamp_percentage(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, PERCENT)
}
