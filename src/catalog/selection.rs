//! Quantity-option selection rules for the product page.
//!
//! The CMS publishes a synthetic `quantity == 1` option per variant as the
//! unit-price display row; it is filtered out of every selectable list. When
//! the active variant changes, the selection snaps to the new variant's first
//! pack and any custom extra units reset, so a stale pack choice can never be
//! carried across variants.

use crate::catalog::types::{QuantityOption, Variant};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Pack options a buyer may actually choose, smallest first.
pub fn selectable_options(variant: &Variant) -> Vec<&QuantityOption> {
    let mut options: Vec<&QuantityOption> = variant
        .quantity_options
        .iter()
        .filter(|o| o.quantity > 1)
        .collect();
    options.sort_by_key(|o| o.quantity);
    options
}

/// Default pack for a freshly-selected variant: its smallest selectable
/// option, or none when the variant sells by single units only.
pub fn default_option(variant: &Variant) -> Option<&QuantityOption> {
    selectable_options(variant).first().copied()
}

/// Buyer's current variant/pack choice on a product page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VariantSelection {
    pub variant_sku: Option<String>,
    pub option_label: Option<String>,
    pub extra_units: u32,
}

impl VariantSelection {
    /// Applies the re-selection protocol for a variant change.
    pub fn select_variant(&mut self, variant: &Variant) {
        self.variant_sku = Some(variant.sku.clone());
        self.option_label = default_option(variant).map(|o| o.label.clone());
        self.extra_units = 0;
    }
}
