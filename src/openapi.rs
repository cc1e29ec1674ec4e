use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{catalog, errors, handlers, models, services};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Packshop API",
        description = "Pricing and order backend for a UK packaging supplies storefront",
        version = env!("CARGO_PKG_VERSION"),
    ),
    paths(
        handlers::health::health,
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::get_order_by_session,
        handlers::orders::list_user_orders,
        handlers::orders::update_order_status,
        handlers::pricing::quote,
        handlers::catalog::list_products,
        handlers::catalog::get_product,
    ),
    components(schemas(
        errors::ErrorResponse,
        models::Address,
        models::OrderLine,
        models::OrderStatus,
        catalog::Product,
        catalog::Variant,
        catalog::QuantityOption,
        catalog::PricingTier,
        catalog::PriceQuote,
        catalog::PriceStrategy,
        services::orders::CreateOrderRequest,
        services::orders::UpdateOrderStatusRequest,
        services::orders::OrderResponse,
        services::pricing::QuoteRequest,
        handlers::health::HealthResponse,
    )),
    tags(
        (name = "orders", description = "Order creation and retrieval"),
        (name = "pricing", description = "Quantity-break pricing quotes"),
        (name = "catalog", description = "Read-only CMS product data"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Swagger UI router serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
