use crate::{
    catalog::{pricing, PriceQuote, Product, QuantityOption, Variant},
    cms::CmsClient,
    errors::ServiceError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use validator::Validate;

/// Quote request as submitted by the product page or the cart's
/// re-validation pass.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    #[validate(length(min = 1, message = "Product slug is required"))]
    pub slug: String,
    /// Defaults to the product's first variant
    pub variant_sku: Option<String>,
    /// Selected pack option, matched by label
    pub option_label: Option<String>,
    /// Requested units when no pack option is selected
    pub quantity: Option<u32>,
    /// Extra units added on top of a selected pack
    pub extra_units: Option<u32>,
}

/// Prices (product, variant, quantity) triples against live CMS data.
#[derive(Clone)]
pub struct PricingService {
    cms: Arc<CmsClient>,
}

impl PricingService {
    pub fn new(cms: Arc<CmsClient>) -> Self {
        Self { cms }
    }

    /// Fetches the product from the CMS and prices the request.
    #[instrument(skip(self, request), fields(slug = %request.slug))]
    pub async fn quote(&self, request: QuoteRequest) -> Result<PriceQuote, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let product = self
            .cms
            .get_product(&request.slug)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", request.slug)))?;

        Self::quote_product(&product, &request)
    }

    /// Pure half of the quote path, shared with tests and the cart
    /// re-validation pass.
    pub fn quote_product(
        product: &Product,
        request: &QuoteRequest,
    ) -> Result<PriceQuote, ServiceError> {
        let variant = resolve_variant(product, request.variant_sku.as_deref())?;
        let option = resolve_option(variant, request.option_label.as_deref())?;

        // A selected pack contributes its size plus any extra units; plain
        // quantity requests pass through and get clamped by the engine.
        let quantity = match option {
            Some(opt) => pricing::effective_quantity(opt, request.extra_units.unwrap_or(0)),
            None => request.quantity.unwrap_or(1),
        };

        Ok(pricing::quote(product, variant, option, quantity))
    }
}

/// Resolves the active variant. A product without variants behaves as one
/// implicit default variant with zero adjustment, represented as `None`.
fn resolve_variant<'a>(
    product: &'a Product,
    sku: Option<&str>,
) -> Result<Option<&'a Variant>, ServiceError> {
    match sku {
        Some(sku) => product
            .variants
            .iter()
            .find(|v| v.sku == sku)
            .map(Some)
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Product {} has no variant with SKU {}",
                    product.slug, sku
                ))
            }),
        None => Ok(product.variants.first()),
    }
}

fn resolve_option<'a>(
    variant: Option<&'a Variant>,
    label: Option<&str>,
) -> Result<Option<&'a QuantityOption>, ServiceError> {
    let Some(label) = label else {
        return Ok(None);
    };
    let Some(variant) = variant else {
        return Err(ServiceError::ValidationError(format!(
            "Quantity option {} selected but the product has no variants",
            label
        )));
    };
    variant
        .quantity_options
        .iter()
        .find(|o| o.label == label)
        .map(Some)
        .ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "Variant {} has no quantity option {}",
                variant.sku, label
            ))
        })
}
