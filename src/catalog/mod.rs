//! CMS-sourced catalogue records and the pure pricing engine.

pub mod pricing;
pub mod selection;
pub mod types;

pub use pricing::{PriceQuote, PriceStrategy};
pub use types::{PricingTier, Product, QuantityOption, Variant};
